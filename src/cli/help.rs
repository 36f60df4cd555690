//! Help and version text
//!
//! Rendered by hand instead of clap's generated help so the layout, the
//! example sections and the optional colouring stay under our control.

use crate::config::EnvManager;
use crate::{BUILD_TIME, COPYRIGHT, GIT_COMMIT, PROGRAM_NAME, VERSION};
use colored::*;

/// Help text renderer for the command-line interface
pub struct HelpSystem;

impl HelpSystem {
    pub fn new() -> Self {
        Self
    }

    /// Full help screen printed for `-h/--help`
    pub fn display_main_help(&self, use_colors: bool) -> String {
        let mut help = String::new();

        help.push_str(&self.format_header(use_colors));
        help.push('\n');
        help.push_str(&self.format_usage_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_options_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_examples(
            "TCP Mode Examples:",
            &TCP_EXAMPLES,
            use_colors,
        ));
        help.push('\n');
        help.push_str(&self.format_examples(
            "HTTP Mode Examples:",
            &HTTP_EXAMPLES,
            use_colors,
        ));
        help.push('\n');
        help.push_str(&EnvManager::display_env_help());

        help
    }

    /// Version screen printed for `-V/--version`
    pub fn display_version(&self) -> String {
        let mut version = format!("{} version {}\n", PROGRAM_NAME, VERSION);
        if GIT_COMMIT != "unknown" {
            version.push_str(&format!("Git commit: {}\n", GIT_COMMIT));
        }
        if let Some(build_time) = BUILD_TIME {
            version.push_str(&format!("Build time: {}\n", build_time));
        }
        version.push_str(COPYRIGHT);
        version.push('\n');
        version
    }

    fn format_header(&self, use_colors: bool) -> String {
        let title = format!("{} {} - TCP/HTTP Connection Test Tool", PROGRAM_NAME, VERSION);
        let description = format!(
            "{} tests TCP connectivity or HTTP/HTTPS service response to target hosts.",
            PROGRAM_NAME
        );

        if use_colors {
            format!("{}\n\n{}\n", title.bright_cyan().bold(), description)
        } else {
            format!("{}\n\n{}\n", title, description)
        }
    }

    fn format_usage_section(&self, use_colors: bool) -> String {
        let patterns = [
            "tcping [options] <host> [port]                  # TCP mode (default port: 80)",
            "tcping -H [options] <URI>                       # HTTP mode",
        ];

        let mut usage = String::new();
        for pattern in patterns {
            if use_colors {
                usage.push_str(&format!("{}\n", pattern.bright_white()));
            } else {
                usage.push_str(&format!("{}\n", pattern));
            }
        }
        usage
    }

    fn format_options_section(&self, use_colors: bool) -> String {
        let header = section_header("Options:", use_colors);

        let mut output = format!("{}\n", header);
        for option in OPTIONS.iter() {
            output.push_str(&option.format(use_colors));
            output.push('\n');
        }
        output
    }

    fn format_examples(&self, title: &str, examples: &[&str], use_colors: bool) -> String {
        let mut output = format!("{}\n", section_header(title, use_colors));
        for example in examples {
            if use_colors {
                output.push_str(&format!("    {}\n", example.bright_white()));
            } else {
                output.push_str(&format!("    {}\n", example));
            }
        }
        output
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn section_header(title: &str, use_colors: bool) -> String {
    if use_colors {
        title.bright_green().bold().to_string()
    } else {
        title.to_string()
    }
}

/// One line of the options table
struct OptionHelp {
    short: char,
    long: &'static str,
    value: &'static str,
    description: &'static str,
}

impl OptionHelp {
    fn format(&self, use_colors: bool) -> String {
        let flags = if self.value.is_empty() {
            format!("-{}, --{}", self.short, self.long)
        } else {
            format!("-{}, --{} {}", self.short, self.long, self.value)
        };

        if use_colors {
            format!("    {}{}", format!("{:<24}", flags).bright_cyan(), self.description)
        } else {
            format!("    {:<24}{}", flags, self.description)
        }
    }
}

const OPTIONS: [OptionHelp; 13] = [
    OptionHelp { short: '4', long: "ipv4", value: "", description: "Force IPv4" },
    OptionHelp { short: '6', long: "ipv6", value: "", description: "Force IPv6" },
    OptionHelp { short: 'n', long: "count", value: "<count>", description: "Number of requests to send (default: 4)" },
    OptionHelp { short: 'p', long: "port", value: "<port>", description: "Specify the port to connect to (default: 80)" },
    OptionHelp { short: 't', long: "interval", value: "<ms>", description: "Request interval in milliseconds (default: 1000ms)" },
    OptionHelp { short: 'w', long: "timeout", value: "<ms>", description: "Connection timeout in milliseconds (default: 1000ms)" },
    OptionHelp { short: 'c', long: "color", value: "", description: "Enable colored output" },
    OptionHelp { short: 'v', long: "verbose", value: "", description: "Enable verbose mode, show more connection details" },
    OptionHelp { short: 'H', long: "http", value: "", description: "Enable HTTP mode to test HTTP/HTTPS services" },
    OptionHelp { short: 'k', long: "insecure", value: "", description: "Skip SSL/TLS certificate verification (HTTP mode only)" },
    OptionHelp { short: 'l', long: "language", value: "<code>", description: "Output language (en-US, zh-CN, zh-TW, ja-JP, ko-KR)" },
    OptionHelp { short: 'V', long: "version", value: "", description: "Show version information" },
    OptionHelp { short: 'h', long: "help", value: "", description: "Show this help information" },
];

const TCP_EXAMPLES: [&str; 5] = [
    "tcping google.com                    # Basic usage (default port 80)",
    "tcping google.com 80                 # Basic usage with port specified",
    "tcping -p 443 google.com             # Use -p flag to specify port",
    "tcping -4 -n 5 8.8.8.8 443           # IPv4, 5 requests",
    "tcping -c -v example.com 443         # Colored output and verbose mode",
];

const HTTP_EXAMPLES: [&str; 5] = [
    "tcping -H https://www.google.com     # Test HTTPS service",
    "tcping -H http://example.com         # Test HTTP service",
    "tcping -H -n 10 https://github.com   # Send 10 HTTP requests",
    "tcping -H -v https://api.github.com  # Verbose mode, show response details",
    "tcping -H -k https://self-signed.badssl.com  # Skip SSL certificate verification",
];
