//! Typed Environment Configuration
//!
//! Binds flat string maps such as the process environment to strongly-typed,
//! eagerly validated configuration. The core is a type-directed conversion
//! engine: a [`TypeDescriptor`] selects a parser from a [`ParserRegistry`],
//! and generic containers recurse back into the converter for their
//! element types.

pub mod app;
pub mod binding;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use binding::{
    Binder, BoundConfig, ConfigCache, ConfigSchema, ConfigSource, EnvConfig, EnvSource, EnvVarNaming, FieldSpec,
    NamingPolicy,
};
pub use convert::{Converter, TypeConverter};
pub use error::{ConfigError, FieldFailure, Result, ValueErrorKind};
pub use models::{EnumConstant, FromValue, Settings, Uri, Value};
pub use output::{OutputFormatter, OutputFormatterFactory};
pub use registry::{CustomParser, ParserRegistration, ParserRegistry, ValueParser};
pub use types::{Describe, EnumDescriptor, TypeDescriptor};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// Default configuration values
pub mod defaults {
    use crate::logging::{LogFormat, LogLevel};

    /// Separator between list, set, array and map elements
    pub const LIST_SEPARATOR: char = ',';
    /// Separator between a map key and its value
    pub const MAP_ENTRY_SEPARATOR: char = ':';
    /// Joins the prefix and the words of a derived variable name
    pub const NAME_SEPARATOR: char = '_';
    /// Cache namespace used when no prefix is given
    pub const DEFAULT_NAMESPACE: &str = "default";
    pub const SECRET_MASK: &str = "******";
    /// Prefix of the variables that configure the library itself
    pub const SETTINGS_ENV_PREFIX: &str = "ENVCONFIG";
    pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Warn;
    pub const DEFAULT_LOG_FORMAT: LogFormat = LogFormat::Console;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    pub const DEFAULT_MASK_SECRETS: bool = true;
}
