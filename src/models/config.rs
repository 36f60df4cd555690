//! Run configuration data model

use crate::config::validation::{non_negative_ms, validate_port};
use crate::messages::Locale;
use crate::types::{AppError, ProbeMode, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resolved configuration for one run.
///
/// Built once by the config parser and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Force IPv4 resolution
    #[serde(default)]
    pub use_ipv4: bool,

    /// Force IPv6 resolution
    #[serde(default)]
    pub use_ipv6: bool,

    /// Number of probes, `0` for an unbounded run
    #[serde(default = "default_count")]
    pub count: u64,

    /// Delay between probes in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Per-probe timeout in milliseconds, `0` disables the deadline
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Default port from `TCPING_PORT`; `-p` and a positional port take
    /// precedence and are applied during target selection
    #[serde(default)]
    pub port: Option<u16>,

    /// TCP connect or HTTP GET
    #[serde(default)]
    pub mode: ProbeMode,

    /// Skip TLS certificate verification (HTTP only)
    #[serde(default)]
    pub insecure: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Language of the run output
    #[serde(default)]
    pub locale: Locale,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            use_ipv4: false,
            use_ipv6: false,
            count: default_count(),
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
            port: None,
            mode: ProbeMode::Tcp,
            insecure: false,
            color: default_enable_color(),
            verbose: false,
            locale: Locale::default(),
        }
    }
}

impl Options {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay between two probes
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Per-probe deadline, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    /// Whether the run only ends on cancellation
    pub fn is_unbounded(&self) -> bool {
        self.count == 0
    }

    /// Environment default port, falling back to 80
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(crate::defaults::DEFAULT_PORT)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.use_ipv4 && self.use_ipv6 {
            return Err(AppError::validation("Cannot use both -4 and -6 flags"));
        }

        if self.port == Some(0) {
            return Err(AppError::validation("Port number must be between 1 and 65535"));
        }

        Ok(())
    }

    /// Merge `TCPING_*` environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(count) = std::env::var("TCPING_COUNT") {
            let count: i64 = count.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TCPING_COUNT value '{}': {}", count, e)))?;
            if count < 0 {
                return Err(AppError::config(format!("TCPING_COUNT cannot be negative, got: {}", count)));
            }
            self.count = count as u64;
        }

        if let Ok(interval) = std::env::var("TCPING_INTERVAL") {
            let value: i64 = interval.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TCPING_INTERVAL value '{}': {}", interval, e)))?;
            self.interval_ms = non_negative_ms("Interval time", value)
                .map_err(|e| AppError::config(format!("TCPING_INTERVAL: {}", e)))?;
        }

        if let Ok(timeout) = std::env::var("TCPING_TIMEOUT") {
            let value: i64 = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TCPING_TIMEOUT value '{}': {}", timeout, e)))?;
            self.timeout_ms = non_negative_ms("Timeout", value)
                .map_err(|e| AppError::config(format!("TCPING_TIMEOUT: {}", e)))?;
        }

        if let Ok(port) = std::env::var("TCPING_PORT") {
            let port = validate_port(port.trim())
                .map_err(|e| AppError::config(format!("TCPING_PORT: {}", e)))?;
            self.port = Some(port);
        }

        if let Ok(color) = std::env::var("TCPING_COLOR") {
            self.color = color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TCPING_COLOR value '{}': {}", color, e)))?;
        }

        if let Ok(insecure) = std::env::var("TCPING_INSECURE") {
            self.insecure = insecure.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TCPING_INSECURE value '{}': {}", insecure, e)))?;
        }

        self.locale = Locale::from_env();

        Ok(())
    }
}

// Default value functions for serde
fn default_count() -> u64 {
    crate::defaults::DEFAULT_COUNT
}

fn default_interval_ms() -> u64 {
    crate::defaults::DEFAULT_INTERVAL_MS
}

fn default_timeout_ms() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT_MS
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
