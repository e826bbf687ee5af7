//! Error handling for typed configuration binding

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a raw string could not be turned into a value of the target type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueErrorKind {
    /// Text other than `true`/`false` given for a boolean
    InvalidBoolean,
    /// Malformed or out-of-range numeric literal
    NumberFormat,
    /// Empty input where a value is required
    MissingValue,
    /// No enum constant with the given name
    IllegalValue,
    /// Unparseable URL/URI or single character
    IllegalArgument,
    /// Malformed ISO-8601 temporal text
    DateTimeFormat,
    /// Delimited text with the wrong shape (e.g. a map entry without `:`)
    Structure,
    /// Failure reported by a user-supplied parser
    Custom,
}

impl ValueErrorKind {
    /// Short label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidBoolean => "invalid-boolean",
            Self::NumberFormat => "number-format",
            Self::MissingValue => "missing-value",
            Self::IllegalValue => "illegal-value",
            Self::IllegalArgument => "illegal-argument",
            Self::DateTimeFormat => "date-time-format",
            Self::Structure => "structure",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ValueErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field that failed during a binding pass
#[derive(Debug)]
pub struct FieldFailure {
    /// Declared field name
    pub field: String,
    /// Resolved source key (environment variable name)
    pub env_var: String,
    /// Raw text that was converted, `None` when masked or absent
    pub raw: Option<String>,
    /// The conversion error
    pub error: ConfigError,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => write!(f, "{} ({}) - failed to parse \"{}\": {}", self.field, self.env_var, raw, self.error),
            None => write!(f, "{} ({}) - {}", self.field, self.env_var, self.error),
        }
    }
}

/// Error kinds produced while describing, converting and binding configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No parser is registered or derivable for a descriptor
    #[error("No parser registered for: {descriptor}")]
    MissingParser { descriptor: String },

    /// Descriptor shape the converter cannot dispatch
    #[error("Unsupported type: {0}")]
    UnsupportedDescriptor(String),

    /// Raw text cannot be interpreted as the target type
    #[error("Invalid {target} ({kind}): {reason}, got \"{raw}\"")]
    MalformedValue {
        target: String,
        raw: String,
        kind: ValueErrorKind,
        reason: String,
    },

    /// An element of a list/set/array/map failed to convert
    #[error("Invalid {target} element #{position} \"{element}\": {source}")]
    MalformedContainer {
        target: String,
        position: usize,
        element: String,
        source: Box<ConfigError>,
    },

    /// A custom parser could not be registered
    #[error("Parser registration error: {0}")]
    Registration(String),

    /// A bound value was requested as the wrong Rust type
    #[error("Field '{field}' holds {found}, not {expected}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// A bound value was requested for an undeclared field
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Aggregated failures of a whole binding pass
    #[error("{}", render_failures(.config, .failures))]
    Binding {
        config: String,
        failures: Vec<FieldFailure>,
    },

    /// I/O errors (.env files, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Settings and environment-file errors
    #[error("Configuration error: {0}")]
    Config(String),
}

fn render_failures(config: &str, failures: &[FieldFailure]) -> String {
    let mut out = format!("Failed to bind {} with {} error(s):", config, failures.len());
    for failure in failures {
        out.push_str("\n  - ");
        out.push_str(&failure.to_string());
    }
    out
}

impl ConfigError {
    /// Create a new malformed-value error
    pub fn malformed<T, R, S>(target: T, raw: R, kind: ValueErrorKind, reason: S) -> Self
    where
        T: Into<String>,
        R: Into<String>,
        S: Into<String>,
    {
        Self::MalformedValue {
            target: target.into(),
            raw: raw.into(),
            kind,
            reason: reason.into(),
        }
    }

    /// Wrap an element failure into a malformed-container error
    pub fn container<T, E>(target: T, position: usize, element: E, source: ConfigError) -> Self
    where
        T: Into<String>,
        E: Into<String>,
    {
        Self::MalformedContainer {
            target: target.into(),
            position,
            element: element.into(),
            source: Box::new(source),
        }
    }

    /// Create a new missing-parser error
    pub fn missing_parser<S: fmt::Display>(descriptor: S) -> Self {
        Self::MissingParser { descriptor: descriptor.to_string() }
    }

    /// Create a new unsupported-descriptor error
    pub fn unsupported<S: Into<String>>(message: S) -> Self {
        Self::UnsupportedDescriptor(message.into())
    }

    /// Create a new registration error
    pub fn registration<S: Into<String>>(message: S) -> Self {
        Self::Registration(message.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Value error kind of this error, looking through container wrappers
    pub fn value_kind(&self) -> Option<ValueErrorKind> {
        match self {
            Self::MalformedValue { kind, .. } => Some(*kind),
            Self::MalformedContainer { source, .. } => source.value_kind(),
            _ => None,
        }
    }

    /// Whether the error was caused by bad input rather than misconfiguration
    pub fn is_value_error(&self) -> bool {
        matches!(self, Self::MalformedValue { .. } | Self::MalformedContainer { .. })
    }

    /// Replace the offending raw text with `mask`, for errors about secret values
    pub fn redact(self, mask: &str) -> Self {
        match self {
            Self::MalformedValue { target, raw, kind, reason } => {
                let reason = if raw.is_empty() { reason } else { reason.replace(&raw, mask) };
                let raw = if raw.is_empty() { raw } else { mask.to_string() };
                Self::MalformedValue { target, raw, kind, reason }
            }
            Self::MalformedContainer { target, position, source, .. } => Self::MalformedContainer {
                target,
                position,
                element: mask.to_string(),
                source: Box::new(source.redact(mask)),
            },
            other => other,
        }
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingParser { .. } => "PARSER",
            Self::UnsupportedDescriptor(_) => "TYPE",
            Self::MalformedValue { .. } => "VALUE",
            Self::MalformedContainer { .. } => "CONTAINER",
            Self::Registration(_) => "REGISTRATION",
            Self::TypeMismatch { .. } | Self::UnknownField(_) => "ACCESS",
            Self::Binding { .. } => "BINDING",
            Self::Io(_) => "IO",
            Self::Config(_) => "CONFIG",
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Binding { .. } | Self::MalformedValue { .. } | Self::MalformedContainer { .. } => 1,  // Bad input
            Self::MissingParser { .. } | Self::UnsupportedDescriptor(_) | Self::Registration(_) => 2,  // Bad declarations
            Self::TypeMismatch { .. } | Self::UnknownField(_) => 3,
            Self::Config(_) => 4,
            Self::Io(_) => 5,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Binding { .. } | Self::MalformedValue { .. } | Self::MalformedContainer { .. } => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::MissingParser { .. } | Self::UnsupportedDescriptor(_) | Self::Registration(_) => {
                    format!("[{}] {}", category.magenta().bold(), message.magenta())
                }
                Self::TypeMismatch { .. } | Self::UnknownField(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Config(_) | Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<dotenv::Error> for ConfigError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

/// Custom Result type for the crate
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = ConfigError::malformed("i32", "abc", ValueErrorKind::NumberFormat, "invalid digit found in string");
        assert!(matches!(error, ConfigError::MalformedValue { .. }));
        assert_eq!(error.to_string(), "Invalid i32 (number-format): invalid digit found in string, got \"abc\"");

        let error = ConfigError::missing_parser("Money");
        assert_eq!(error.to_string(), "No parser registered for: Money");
    }

    #[test]
    fn test_value_kind_through_containers() {
        let inner = ConfigError::malformed("bool", "maybe", ValueErrorKind::InvalidBoolean, "expected true or false");
        let outer = ConfigError::container("list<bool>", 2, "maybe", inner);

        assert_eq!(outer.value_kind(), Some(ValueErrorKind::InvalidBoolean));
        assert!(outer.is_value_error());
        assert!(outer.to_string().contains("element #2"));
        assert!(std::error::Error::source(&outer).is_some());
    }

    #[test]
    fn test_redact_hides_raw_text() {
        let inner = ConfigError::malformed("local_date", "s3cr3t", ValueErrorKind::DateTimeFormat, "'s3cr3t' is not a local date");
        let error = ConfigError::container("list<local_date>", 0, "s3cr3t", inner).redact("***");

        let message = error.to_string();
        assert!(!message.contains("s3cr3t"));
        assert!(message.contains("***"));
        assert_eq!(error.value_kind(), Some(ValueErrorKind::DateTimeFormat));

        let empty = ConfigError::malformed("string", "", ValueErrorKind::MissingValue, "missing value").redact("***");
        assert!(!empty.to_string().contains("***"));
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ConfigError::missing_parser("x").category(), "PARSER");
        assert_eq!(ConfigError::registration("x").category(), "REGISTRATION");
        assert_eq!(ConfigError::config("x").category(), "CONFIG");
        assert_eq!(ConfigError::UnknownField("x".to_string()).category(), "ACCESS");
    }

    #[test]
    fn test_exit_codes() {
        let binding = ConfigError::Binding { config: "App".to_string(), failures: Vec::new() };
        assert_eq!(binding.exit_code(), 1);
        assert_eq!(ConfigError::missing_parser("x").exit_code(), 2);
        assert_eq!(ConfigError::io("x").exit_code(), 5);
    }

    #[test]
    fn test_binding_report_lists_every_failure() {
        let failures = vec![
            FieldFailure {
                field: "dbPoolSize".to_string(),
                env_var: "MYAPP_DB_POOL_SIZE".to_string(),
                raw: Some("ten".to_string()),
                error: ConfigError::malformed("i32", "ten", ValueErrorKind::NumberFormat, "invalid digit found in string"),
            },
            FieldFailure {
                field: "dbJdbcUrl".to_string(),
                env_var: "MYAPP_DB_JDBC_URL".to_string(),
                raw: None,
                error: ConfigError::malformed("string", "", ValueErrorKind::MissingValue, "missing value"),
            },
        ];
        let error = ConfigError::Binding { config: "MyAppConfig".to_string(), failures };
        let report = error.to_string();

        assert!(report.starts_with("Failed to bind MyAppConfig with 2 error(s):"));
        assert!(report.contains("dbPoolSize (MYAPP_DB_POOL_SIZE) - failed to parse \"ten\""));
        assert!(report.contains("dbJdbcUrl (MYAPP_DB_JDBC_URL) - Invalid string"));
    }

    #[test]
    fn test_console_formatting() {
        let error = ConfigError::config("bad settings");
        let plain = error.format_for_console(false);
        assert_eq!(plain, "[CONFIG] Configuration error: bad settings");

        let colored = error.format_for_console(true);
        assert!(colored.contains("bad settings"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: ConfigError = io.into();
        assert!(matches!(error, ConfigError::Io(_)));
    }
}
