//! Error handling for tcping
//!
//! Three layers of failure exist:
//! - [`AppError`]: fatal, raised before the probe loop starts
//! - [`ResolveError`]: fatal address resolution failures, wrapped by [`AppError`]
//! - [`ProbeError`]: a single failed probe, recorded and then forgotten

use std::time::Duration;
use thiserror::Error;

/// Errors that end the run before any probe is issued
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid flags or positional arguments
    #[error("{0}")]
    Validation(String),

    /// Environment or `.env` configuration problems
    #[error("Configuration error: {0}")]
    Config(String),

    /// Target address could not be resolved
    #[error(transparent)]
    Resolution(#[from] ResolveError),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(String),

    /// I/O errors (signal registration, runtime setup)
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new HTTP client error
    pub fn http<S: Into<String>>(message: S) -> Self {
        Self::Http(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::Config(_) => "CONFIG",
            Self::Resolution(_) => "RESOLUTION",
            Self::Http(_) => "HTTP",
            Self::Io(_) => "IO",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Process exit code for this error.
    ///
    /// Every error surfaced through [`AppError`] happens before probing
    /// starts, so all of them map to `1`.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Format error for console display, `Error: <message>`
    pub fn format_for_console(&self, use_color: bool) -> String {
        let message = format!("Error: {}", self);
        if use_color {
            use colored::Colorize;
            message.red().to_string()
        } else {
            message
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::validation(format!("Invalid URI format: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::validation(format!("Integer parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        Self::http(error.to_string())
    }
}

/// Address resolution failures, in the order the resolver can raise them
#[derive(Error, Debug)]
pub enum ResolveError {
    /// IPv6 mode does not accept decimal or hexadecimal integer shorthand
    #[error("IPv6 addresses do not support {format} format: {input}")]
    UnsupportedNumericFormat { input: String, format: &'static str },

    /// An IP literal of the wrong family was given for a forced family
    #[error("Address {address} is not an {expected} address")]
    AddressFamilyMismatch { address: String, expected: &'static str },

    /// The DNS lookup itself failed
    #[error("Failed to resolve {host}: {cause}")]
    ResolutionFailure { host: String, cause: String },

    /// The lookup succeeded but returned nothing
    #[error("No IP address found for {host}")]
    NoAddressFound { host: String },

    /// The lookup returned addresses, none of the requested family
    #[error("No {family} address found for {host}")]
    NoAddressOfFamily { host: String, family: &'static str },
}

/// Failure of a single probe attempt. Never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// TCP dial failed (refused, unreachable, ...)
    #[error("{0}")]
    Connect(String),

    /// The attempt did not finish within the per-probe timeout
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The HTTP request could not be constructed
    #[error("request construction failed: {0}")]
    RequestBuild(String),

    /// The HTTP request failed before a response arrived
    #[error("{0}")]
    Request(String),

    /// The response body could not be read to completion
    #[error("{0}")]
    ResponseRead(String),

    /// A response arrived with a status outside `[200, 400)`
    #[error("HTTP status {0}")]
    HttpStatus(u16),
}

impl ProbeError {
    /// Short tag used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect",
            Self::Timeout(_) => "timeout",
            Self::RequestBuild(_) => "request_build",
            Self::Request(_) => "request",
            Self::ResponseRead(_) => "response_read",
            Self::HttpStatus(_) => "http_status",
        }
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;
