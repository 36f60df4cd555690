//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load an env file if it exists and report whether it was loaded.
    /// Variables already present in the process environment are left
    /// untouched.
    pub fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        dotenv::from_path(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;
        Ok(true)
    }

    /// Supported environment variables with descriptions and examples
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("TCPING_COUNT", "Number of probes, 0 runs until interrupted", "10"),
            ("TCPING_INTERVAL", "Delay between probes in milliseconds", "500"),
            ("TCPING_TIMEOUT", "Per-probe timeout in milliseconds, 0 disables it", "2000"),
            ("TCPING_PORT", "Default TCP port (1-65535)", "443"),
            ("TCPING_COLOR", "Enable colored output", "true"),
            ("TCPING_INSECURE", "Skip TLS certificate verification in HTTP mode", "false"),
            ("TCPING_LANG", "Output language, checked before LC_ALL, LC_MESSAGES and LANG", "zh-CN"),
            ("TCPING_LOG", "Diagnostic log level (trace, debug, info, warn, error)", "debug"),
            ("TCPING_LOG_FORMAT", "Diagnostic log format (console, json)", "json"),
        ]
    }

    /// Environment help text
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<18} {}\n", var, description));
            help.push_str(&format!("  {:<18} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }
}
