//! Structured logging for configuration binding
//!
//! This module provides:
//! - Leveled structured log entries with correlation IDs
//! - Console, JSON and compact output formats
//! - A binding-event logger that masks secret values

use crate::error::{ConfigError, Result};
use crate::models::Settings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - general application information
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - error events but application can continue
    Error = 4,
    /// Fatal level - severe error events that cause application termination
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",    // White
            LogLevel::Debug => "\x1b[36m",    // Cyan
            LogLevel::Info => "\x1b[32m",     // Green
            LogLevel::Warn => "\x1b[33m",     // Yellow
            LogLevel::Error => "\x1b[31m",    // Red
            LogLevel::Fatal => "\x1b[35m",    // Magenta
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(ConfigError::config(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(ConfigError::config(format!("Invalid log format: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Where formatted entries go
#[derive(Debug, Clone)]
enum LogSink {
    Stderr,
    Memory(Arc<Mutex<Vec<String>>>),
    Discard,
}

/// Handle to the lines written by a capturing logger
#[derive(Debug, Clone)]
pub struct LogCapture(Arc<Mutex<Vec<String>>>);

impl LogCapture {
    /// Formatted lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Logger implementation with multiple output formats
#[derive(Debug, Clone)]
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Output format
    format: LogFormat,
    /// Logger name
    name: String,
    sink: LogSink,
}

impl Logger {
    /// Create a new logger writing to stderr
    pub fn new(name: &str) -> Self {
        Self {
            min_level: crate::defaults::DEFAULT_LOG_LEVEL,
            use_color: false,
            format: LogFormat::Console,
            name: name.to_string(),
            sink: LogSink::Stderr,
        }
    }

    /// Create a logger with specific configuration
    pub fn with_settings(name: &str, settings: &Settings) -> Self {
        let min_level = if settings.debug { LogLevel::Debug } else { settings.log_level };

        Self {
            min_level,
            use_color: settings.enable_color,
            format: settings.log_format,
            name: name.to_string(),
            sink: LogSink::Stderr,
        }
    }

    /// Create a logger that drops every entry
    pub fn silent(name: &str) -> Self {
        Self {
            sink: LogSink::Discard,
            ..Self::new(name)
        }
    }

    /// Create a logger that keeps formatted entries in memory
    pub fn capturing(name: &str, min_level: LogLevel) -> (Self, LogCapture) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let logger = Self {
            min_level,
            sink: LogSink::Memory(Arc::clone(&lines)),
            ..Self::new(name)
        };
        (logger, LogCapture(lines))
    }

    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level && !matches!(self.sink, LogSink::Discard)
    }

    /// Write log entry to output
    fn write_entry(&self, entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        let output = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
            LogFormat::Compact => self.format_compact(&entry),
        };

        match &self.sink {
            LogSink::Stderr => {
                let _ = writeln!(io::stderr(), "{}", output);
            }
            LogSink::Memory(lines) => {
                lines.lock().unwrap_or_else(PoisonError::into_inner).push(output);
            }
            LogSink::Discard => {}
        }
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}",
            timestamp,
            formatted_level,
            entry.logger,
            entry.message
        );

        // Show first 8 chars of the correlation ID
        if let Some(correlation_id) = &entry.correlation_id {
            let short = correlation_id.get(..8).unwrap_or(correlation_id);
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let fields_str: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }

    /// Format log entry in compact format
    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        format!("{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        )
    }
}

/// Builder pattern for creating log entries
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
                correlation_id: None,
                fields: BTreeMap::new(),
            },
        }
    }

    /// Add a correlation ID
    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add error information
    pub fn error_info(self, error: &ConfigError) -> Self {
        let builder = self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code());
        match error.value_kind() {
            Some(kind) => builder.field("value_error", kind.as_str()),
            None => builder,
        }
    }

    /// Finalize and write the log entry
    pub fn log(self) {
        self.logger.write_entry(self.entry);
    }
}

/// Specialized logger for binding passes
#[derive(Debug, Clone)]
pub struct BindingLogger {
    logger: Logger,
    mask_secrets: bool,
}

impl BindingLogger {
    /// Create a new binding logger
    pub fn new(logger: Logger, mask_secrets: bool) -> Self {
        Self { logger, mask_secrets }
    }

    pub fn masks_secrets(&self) -> bool {
        self.mask_secrets
    }

    /// Start a correlated binding pass
    pub fn start_pass(&self, config: &str, field_count: usize) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        self.logger.debug(&format!("Binding {} ({} fields)", config, field_count))
            .correlation_id(&correlation_id)
            .field("config", config)
            .field("field_count", field_count)
            .log();
        correlation_id
    }

    /// Text safe to show for a field value
    pub fn display_value<'v>(&self, raw: &'v str, secret: bool) -> &'v str {
        if secret && self.mask_secrets {
            crate::defaults::SECRET_MASK
        } else {
            raw
        }
    }

    /// Log how a field's raw value was resolved
    pub fn log_field_resolved(
        &self,
        correlation_id: &str,
        field: &str,
        env_var: &str,
        origin: &str,
        raw: Option<&str>,
        secret: bool,
    ) {
        let mut builder = self.logger.debug(&format!("Resolved {} from {}", field, origin))
            .correlation_id(correlation_id)
            .field("field", field)
            .field("env_var", env_var)
            .field("origin", origin);

        if let Some(raw) = raw {
            builder = builder.field("value", self.display_value(raw, secret));
        }

        builder.log();
    }

    /// Log a field that failed to convert
    pub fn log_field_failure(&self, correlation_id: &str, field: &str, env_var: &str, error: &ConfigError) {
        self.logger.warn(&format!("Field {} ({}) failed: {}", field, env_var, error))
            .correlation_id(correlation_id)
            .field("field", field)
            .field("env_var", env_var)
            .error_info(error)
            .log();
    }

    /// Log the outcome of a binding pass
    pub fn finish_pass(&self, correlation_id: &str, config: &str, bound: usize, failed: usize) {
        let level = if failed == 0 { LogLevel::Info } else { LogLevel::Warn };
        self.logger.log(level, &format!("Bound {}: {} fields, {} failures", config, bound, failed))
            .correlation_id(correlation_id)
            .field("config", config)
            .field("bound", bound)
            .field("failed", failed)
            .field("success", failed == 0)
            .log();
    }
}
