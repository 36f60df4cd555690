//! Command-line interface

pub mod help;

pub use help::HelpSystem;

use clap::Parser;

/// TCP/HTTP connection test tool
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tcping")]
#[command(disable_version_flag = true, disable_help_flag = true)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Force IPv4
    #[arg(short = '4', long)]
    pub ipv4: bool,

    /// Force IPv6
    #[arg(short = '6', long)]
    pub ipv6: bool,

    /// Number of requests to send, 0 runs until interrupted
    #[arg(short = 'n', long, value_name = "count")]
    pub count: Option<i64>,

    /// Port to connect to when not given positionally
    #[arg(short = 'p', long, value_name = "port")]
    pub port: Option<String>,

    /// Request interval in milliseconds
    #[arg(short = 't', long, value_name = "ms")]
    pub interval: Option<i64>,

    /// Connection timeout in milliseconds
    #[arg(short = 'w', long, value_name = "ms")]
    pub timeout: Option<i64>,

    /// Enable colored output
    #[arg(short = 'c', long)]
    pub color: bool,

    /// Enable verbose mode
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Enable HTTP mode
    #[arg(short = 'H', long)]
    pub http: bool,

    /// Skip TLS certificate verification (HTTP mode only)
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Output language: en-US, zh-CN, zh-TW, ja-JP or ko-KR
    #[arg(short = 'l', long, value_name = "code")]
    pub language: Option<String>,

    /// Show version information
    #[arg(short = 'V', long)]
    pub version: bool,

    /// Show help information
    #[arg(short = 'h', long)]
    pub help: bool,

    /// `<host> [port]` in TCP mode, `<URI>` in HTTP mode
    #[arg(value_name = "TARGET")]
    pub args: Vec<String>,
}

impl Cli {
    /// Whether the run only prints information and exits
    pub fn is_informational(&self) -> bool {
        self.help || self.version
    }

    /// Render the help screen
    pub fn display_help(&self) -> String {
        HelpSystem::new().display_main_help(self.color)
    }

    /// Render the version screen
    pub fn display_version(&self) -> String {
        HelpSystem::new().display_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_basic() {
        let cli = Cli::parse_from(["tcping", "-n", "5", "-t", "200", "example.com", "443"]);
        assert_eq!(cli.count, Some(5));
        assert_eq!(cli.interval, Some(200));
        assert_eq!(cli.timeout, None);
        assert_eq!(cli.args, vec!["example.com", "443"]);
        assert!(!cli.http);
    }

    #[test]
    fn test_cli_parsing_all_flags() {
        let cli = Cli::parse_from([
            "tcping", "-4", "-c", "-v", "-k", "-H", "-w", "500", "-p", "8080", "-l", "zh-CN",
            "https://example.com",
        ]);

        assert!(cli.ipv4);
        assert!(!cli.ipv6);
        assert!(cli.color);
        assert!(cli.verbose);
        assert!(cli.insecure);
        assert!(cli.http);
        assert_eq!(cli.timeout, Some(500));
        assert_eq!(cli.port.as_deref(), Some("8080"));
        assert_eq!(cli.language.as_deref(), Some("zh-CN"));
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::parse_from(["tcping", "--ipv6", "--count", "0", "--interval", "0", "--timeout", "0", "::1"]);
        assert!(cli.ipv6);
        assert_eq!(cli.count, Some(0));
        assert_eq!(cli.interval, Some(0));
        assert_eq!(cli.timeout, Some(0));
    }

    #[test]
    fn test_negative_numbers_reach_validation() {
        let cli = Cli::parse_from(["tcping", "-t", "-5", "-w", "-1", "example.com"]);
        assert_eq!(cli.interval, Some(-5));
        assert_eq!(cli.timeout, Some(-1));
    }

    #[test]
    fn test_informational_flags() {
        assert!(Cli::parse_from(["tcping", "-V"]).is_informational());
        assert!(Cli::parse_from(["tcping", "--help"]).is_informational());
        assert!(!Cli::parse_from(["tcping", "example.com"]).is_informational());
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["tcping", "--bogus", "example.com"]).is_err());
        assert!(Cli::try_parse_from(["tcping", "-n", "abc", "example.com"]).is_err());
    }

    #[test]
    fn test_help_and_version_text() {
        let cli = Cli::parse_from(["tcping", "-h"]);
        assert!(cli.display_help().contains("Options:"));
        assert!(cli.display_version().contains("version"));
    }
}
