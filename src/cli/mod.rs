//! Command-line interface of `envcheck`

use crate::binding::{ConfigSchema, FieldSpec};
use crate::types::TypeDescriptor;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// A field declared on the command line as `NAME=TYPE[=DEFAULT]`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldArg {
    pub name: String,
    pub descriptor: TypeDescriptor,
    pub default: Option<String>,
}

/// Bind environment variables to typed fields and report the result
#[derive(Parser, Debug, Clone)]
#[command(name = "envcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Field to bind, as NAME=TYPE[=DEFAULT] (can be used multiple times)
    #[arg(short, long = "field", value_name = "NAME=TYPE[=DEFAULT]", value_parser = parse_field_arg, action = ArgAction::Append)]
    pub fields: Vec<FieldArg>,

    /// Mask the value of a declared field (can be used multiple times)
    #[arg(long = "secret", value_name = "NAME", action = ArgAction::Append)]
    pub secrets: Vec<String>,

    /// Prefix for derived variable names
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Overlay variables from a .env file
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Minimum level of binding events to log (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// List every built-in type name and exit
    #[arg(long)]
    pub list_types: bool,

    /// Print an example .env file for the declared fields and exit
    #[arg(long)]
    pub example_env: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if !self.list_types && self.fields.is_empty() {
            return Err("Must declare at least one field via --field NAME=TYPE".to_string());
        }

        for secret in &self.secrets {
            if !self.fields.iter().any(|f| &f.name == secret) {
                return Err(format!("--secret {} does not name a declared field", secret));
            }
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Whether the JSON report was requested
    pub fn json_output(&self) -> bool {
        self.format == "json"
    }

    /// Schema of the declared fields
    pub fn schema(&self) -> ConfigSchema {
        self.fields.iter().fold(ConfigSchema::new("Environment"), |schema, arg| {
            let mut spec = FieldSpec::new(arg.name.clone(), arg.descriptor.clone())
                .secret(self.secrets.contains(&arg.name));
            if let Some(default) = &arg.default {
                spec = spec.default_value(default.clone());
            }
            schema.field(spec)
        })
    }
}

/// Parse `NAME=TYPE[=DEFAULT]`
fn parse_field_arg(s: &str) -> Result<FieldArg, String> {
    let (name, rest) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid field '{}': expected NAME=TYPE[=DEFAULT]", s))?;
    if name.is_empty() {
        return Err(format!("Invalid field '{}': missing name", s));
    }

    let (type_text, default) = match rest.split_once('=') {
        Some((type_text, default)) => (type_text, Some(default.to_string())),
        None => (rest, None),
    };
    let descriptor = type_text
        .parse::<TypeDescriptor>()
        .map_err(|e| format!("Invalid type for field '{}': {}", name, e))?;

    Ok(FieldArg {
        name: name.to_string(),
        descriptor,
        default,
    })
}

/// Check if the terminal supports color output
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    // Default to true on Unix-like systems, false on Windows
    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
