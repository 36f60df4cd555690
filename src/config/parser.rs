//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::{
        env::EnvManager,
        validation::{non_negative_ms, validate_config, TargetSpec},
    },
    error::{AppError, Result},
    messages::Locale,
    models::Options,
    types::ProbeMode,
};
use std::path::PathBuf;

/// Fully validated input of one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub options: Options,
    pub target: TargetSpec,
    /// Raw `-p` value; it is only validated when no positional port overrides it
    pub port_flag: Option<String>,
    /// Whether a `.env` file contributed to the configuration
    pub env_file_loaded: bool,
}

/// Configuration parser that layers defaults, the environment and CLI flags
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env_file: PathBuf::from(".env"),
        }
    }

    /// Read environment defaults from another file instead of `./.env`
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<RunConfig> {
        let mut options = Options::default();

        let env_file_loaded = EnvManager::load_env_file_from(&self.env_file)?;
        options.merge_from_env()?;

        self.apply_cli_overrides(&mut options)?;

        let port_flag = self.cli.port.clone();
        let target = validate_config(&options, port_flag.as_deref(), &self.cli.args)?;

        Ok(RunConfig {
            options,
            target,
            port_flag,
            env_file_loaded,
        })
    }

    /// Apply flags that were given explicitly on the command line
    fn apply_cli_overrides(&self, options: &mut Options) -> Result<()> {
        let cli = &self.cli;

        if cli.ipv4 && cli.ipv6 {
            return Err(AppError::validation("Cannot use both -4 and -6 flags"));
        }
        options.use_ipv4 = cli.ipv4;
        options.use_ipv6 = cli.ipv6;

        if let Some(interval) = cli.interval {
            options.interval_ms = non_negative_ms("Interval time", interval)?;
        }

        if let Some(timeout) = cli.timeout {
            options.timeout_ms = non_negative_ms("Timeout", timeout)?;
        }

        if let Some(count) = cli.count {
            if count < 0 {
                return Err(AppError::validation("Count cannot be negative"));
            }
            options.count = count as u64;
        }

        if cli.http {
            options.mode = ProbeMode::Http;
        }

        // Boolean flags can only switch behavior on
        options.color |= cli.color;
        options.insecure |= cli.insecure;
        options.verbose = cli.verbose;

        if let Some(ref code) = cli.language {
            options.locale = Locale::from_code_or_default(code);
        }

        Ok(())
    }
}

/// Convenience function to load the complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<RunConfig> {
    ConfigParser::new(cli).parse()
}

/// Configuration summary for diagnostics
pub fn display_config_summary(options: &Options) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Mode: {}", options.mode));
    summary.push(format!(
        "Count: {}",
        if options.is_unbounded() { "unbounded".to_string() } else { options.count.to_string() }
    ));
    summary.push(format!("Interval: {}ms", options.interval_ms));
    summary.push(format!(
        "Timeout: {}",
        if options.timeout_ms == 0 { "disabled".to_string() } else { format!("{}ms", options.timeout_ms) }
    ));
    summary.push(format!("Default port: {}", options.effective_port()));
    summary.push(format!("IPv4 only: {}", options.use_ipv4));
    summary.push(format!("IPv6 only: {}", options.use_ipv6));
    summary.push(format!("Insecure TLS: {}", options.insecure));
    summary.push(format!("Color Output: {}", options.color));
    summary.push(format!("Language: {}", options.locale));

    summary.join("\n")
}
