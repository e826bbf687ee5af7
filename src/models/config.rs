//! Library and CLI settings model

use crate::binding::{Binder, ConfigSchema, ConfigSource, EnvSource, FieldSpec};
use crate::error::{ConfigError, Result};
use crate::logging::{LogFormat, LogLevel, Logger};
use crate::types::{names, TypeDescriptor};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Settings controlling logging, output and environment loading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Minimum level of binding events to log
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    /// Log entry format
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Replace secret field values with a mask in logs and reports
    #[serde(default = "default_mask_secrets")]
    pub mask_secrets: bool,

    /// Optional `.env` file overlaid on the process environment
    #[serde(default)]
    pub env_file: Option<PathBuf>,

    /// Prefix applied to every derived variable name
    #[serde(default)]
    pub prefix: Option<String>,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            enable_color: default_enable_color(),
            mask_secrets: default_mask_secrets(),
            env_file: None,
            prefix: None,
            debug: false,
        }
    }
}

fn optional(name: &str) -> TypeDescriptor {
    TypeDescriptor::optional(TypeDescriptor::simple(name))
}

/// Fields read by [`Settings::merge_from_source`], bound under `ENVCONFIG_`
fn settings_schema() -> ConfigSchema {
    ConfigSchema::new("Settings")
        .field(FieldSpec::new("logLevel", optional(names::STRING)))
        .field(FieldSpec::new("logFormat", optional(names::STRING)))
        .field(FieldSpec::new("color", optional(names::BOOL)))
        .field(FieldSpec::new("maskSecrets", optional(names::BOOL)))
        .field(FieldSpec::new("envFile", optional(names::STRING)))
        .field(FieldSpec::new("prefix", optional(names::STRING)))
}

impl Settings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the settings and return any errors
    pub fn validate(&self) -> Result<()> {
        if let Some(prefix) = &self.prefix {
            if prefix.is_empty() {
                return Err(ConfigError::config("Prefix cannot be empty"));
            }
            if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ConfigError::config(format!(
                    "Prefix '{}' may only contain letters, digits and '_'",
                    prefix
                )));
            }
        }

        if let Some(path) = &self.env_file {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::config("Environment file path cannot be empty"));
            }
        }

        Ok(())
    }

    /// Merge `ENVCONFIG_*` process environment variables into these settings
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_source(&EnvSource::capture())
    }

    /// Merge `ENVCONFIG_*` variables from any source into these settings
    pub fn merge_from_source<S: ConfigSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        let bound = Binder::new(settings_schema())
            .prefix(crate::defaults::SETTINGS_ENV_PREFIX)
            .logger(Logger::silent("SETTINGS"))
            .bind(source)
            .map_err(|e| ConfigError::config(format!("Invalid {}_* settings: {}", crate::defaults::SETTINGS_ENV_PREFIX, e)))?;

        if let Some(level) = bound.get::<Option<String>>("logLevel")? {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(format) = bound.get::<Option<String>>("logFormat")? {
            self.log_format = LogFormat::from_str(&format)?;
        }
        if let Some(color) = bound.get::<Option<bool>>("color")? {
            self.enable_color = color;
        }
        if let Some(mask) = bound.get::<Option<bool>>("maskSecrets")? {
            self.mask_secrets = mask;
        }
        if let Some(path) = bound.get::<Option<String>>("envFile")? {
            self.env_file = Some(PathBuf::from(path));
        }
        if let Some(prefix) = bound.get::<Option<String>>("prefix")? {
            self.prefix = Some(prefix);
        }

        Ok(())
    }

    /// Create a logger configured from these settings
    pub fn logger(&self, name: &str) -> Logger {
        Logger::with_settings(name, self)
    }
}

// Default value functions for serde
fn default_log_level() -> LogLevel {
    crate::defaults::DEFAULT_LOG_LEVEL
}

fn default_log_format() -> LogFormat {
    crate::defaults::DEFAULT_LOG_FORMAT
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

fn default_mask_secrets() -> bool {
    crate::defaults::DEFAULT_MASK_SECRETS
}
