//! Terminal coloring of whole output lines

use colored::Colorize;

/// Color class of a printed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Successful probe, green
    Success,
    /// Failed probe, red
    Error,
    /// Cancellation notices, cyan
    Info,
}

/// Apply `tone` to `text` when color output is enabled.
///
/// The trailing newline stays outside the escape sequence.
pub fn paint(text: &str, tone: Tone, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }

    let (body, newline) = match text.strip_suffix('\n') {
        Some(body) => (body, "\n"),
        None => (text, ""),
    };
    let painted = match tone {
        Tone::Success => body.green(),
        Tone::Error => body.red(),
        Tone::Info => body.cyan(),
    };
    format!("{}{}", painted, newline)
}
