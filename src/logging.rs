//! Structured diagnostic logging
//!
//! Diagnostics go to stderr so they never interleave with the probe report
//! on stdout. Every logger created by one [`LoggerFactory`] shares the
//! session id of the run.
//!
//! - `Console`: `timestamp LEVEL [component] message {fields}`
//! - `Json`: one serialized [`LogEntry`] per line

use crate::error::{AppError, Result};
use crate::models::Options;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;
use uuid::Uuid;

/// Environment variable selecting the minimum level
pub const LOG_LEVEL_ENV: &str = "TCPING_LOG";
/// Environment variable selecting the output format
pub const LOG_FORMAT_ENV: &str = "TCPING_LOG_FORMAT";

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }

    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::config(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// One JSON object per line
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "console" | "text" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            _ => Err(AppError::config(format!("Invalid log format: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Component that emitted the entry
    pub logger: String,
    pub session_id: String,
    /// Additional structured fields, sorted by key
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Logger with a fixed component name
#[derive(Debug, Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    format: LogFormat,
    name: String,
    session_id: Arc<str>,
}

impl Logger {
    /// Create a logger with its own session, `Warn` level, console format
    pub fn new(name: &str) -> Self {
        Self {
            min_level: LogLevel::Warn,
            use_color: false,
            format: LogFormat::Console,
            name: name.to_string(),
            session_id: Arc::from(Uuid::new_v4().to_string()),
        }
    }

    /// Logger that drops everything below `Error`
    pub fn quiet(name: &str) -> Self {
        Self {
            min_level: LogLevel::Error,
            ..Self::new(name)
        }
    }

    /// Same settings and session under another component name
    pub fn named(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn write_entry(&self, entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        let output = self.format_entry(&entry);
        let _ = writeln!(io::stderr().lock(), "{}", output);
    }

    fn format_entry(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => self.format_json(entry),
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if !entry.fields.is_empty() {
            let fields: Vec<String> = entry.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!(
                "{{\"error\": \"Failed to serialize log entry\", \"message\": {:?}}}",
                entry.message
            ),
        }
    }
}

/// Builder for a single log entry
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                session_id: logger.session_id.to_string(),
                fields: BTreeMap::new(),
            },
        }
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add error category and exit code
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub fn log(self) {
        self.logger.write_entry(self.entry);
    }
}

/// Creates the loggers of one run, all sharing a session id
pub struct LoggerFactory {
    template: Logger,
}

impl LoggerFactory {
    /// Level and format follow the run options, then `TCPING_LOG` and
    /// `TCPING_LOG_FORMAT` when set to valid values
    pub fn new(options: &Options) -> Self {
        let mut template = Logger::new("tcping");
        template.set_color(options.color);
        template.set_level(if options.verbose { LogLevel::Debug } else { LogLevel::Warn });

        if let Some(level) = std::env::var(LOG_LEVEL_ENV).ok().and_then(|v| v.parse().ok()) {
            template.set_level(level);
        }
        if let Some(format) = std::env::var(LOG_FORMAT_ENV).ok().and_then(|v| v.parse().ok()) {
            template.set_format(format);
        }

        Self { template }
    }

    pub fn create_logger(&self, name: &str) -> Logger {
        self.template.named(name)
    }

    pub fn session_id(&self) -> &str {
        self.template.session_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn entry(level: LogLevel) -> LogEntry {
        let mut fields = BTreeMap::new();
        fields.insert("host".to_string(), serde_json::Value::String("example.com".to_string()));
        LogEntry {
            timestamp: Utc::now(),
            level,
            message: "Test message".to_string(),
            logger: "TEST".to_string(),
            session_id: "session".to_string(),
            fields,
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("Console").unwrap(), LogFormat::Console);
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_would_log() {
        let mut logger = Logger::new("TEST");
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));

        logger.set_level(LogLevel::Trace);
        assert!(logger.would_log(LogLevel::Trace));

        assert!(!Logger::quiet("TEST").would_log(LogLevel::Warn));
    }

    #[test]
    fn test_named_loggers_share_session() {
        let root = Logger::new("root");
        let child = root.named("dns");
        assert_eq!(root.session_id(), child.session_id());
        assert_ne!(root.session_id(), Logger::new("other").session_id());
    }

    #[test]
    fn test_console_format() {
        let logger = Logger::new("TEST");
        let output = logger.format_console(&entry(LogLevel::Info));
        assert!(output.contains(" INFO [TEST] Test message"));
        assert!(output.contains("host=\"example.com\""));
        assert!(!output.contains('\x1b'));

        let mut colored = Logger::new("TEST");
        colored.set_color(true);
        assert!(colored.format_console(&entry(LogLevel::Error)).contains("\x1b[31m"));
    }

    #[test]
    fn test_json_format() {
        let mut logger = Logger::new("TEST");
        logger.set_format(LogFormat::Json);
        let output = logger.format_entry(&entry(LogLevel::Warn));

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["level"], "Warn");
        assert_eq!(value["logger"], "TEST");
        assert_eq!(value["fields"]["host"], "example.com");
    }

    #[test]
    fn test_builder_fields() {
        let logger = Logger::new("TEST");
        let builder = logger
            .debug("resolved")
            .field("address", "1.2.3.4")
            .error_info(&AppError::validation("bad"));

        assert_eq!(builder.entry.level, LogLevel::Debug);
        assert_eq!(builder.entry.fields["address"], "1.2.3.4");
        assert_eq!(builder.entry.fields["error_category"], "VALIDATION");
        assert_eq!(builder.entry.session_id, logger.session_id());
    }

    #[test]
    fn test_factory_levels() {
        // TCPING_LOG is not set by any test
        let quiet = LoggerFactory::new(&Options::default()).create_logger("A");
        let verbose = LoggerFactory::new(&Options { verbose: true, ..Default::default() }).create_logger("B");
        if std::env::var(LOG_LEVEL_ENV).is_err() {
            assert_eq!(quiet.level(), LogLevel::Warn);
            assert_eq!(verbose.level(), LogLevel::Debug);
        }
    }
}
