//! Schema validation rules
//!
//! Every descriptor is checked before any conversion happens, so the
//! converter never sees an unresolved or malformed descriptor.

use crate::binding::{ConfigSchema, FieldSpec};
use crate::error::{ConfigError, Result};
use crate::types::TypeDescriptor;
use std::collections::HashSet;

/// Schema validator with structural and per-field rules
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validate a whole schema, failing on the first invalid field
    pub fn validate_schema(schema: &ConfigSchema) -> Result<Vec<ValidationWarning>> {
        Self::check_structure(schema)?;

        let mut warnings = Vec::new();
        for field in schema.fields() {
            warnings.extend(Self::check_field(field)?);
        }
        Ok(warnings)
    }

    /// Names must be present and unique
    pub fn check_structure(schema: &ConfigSchema) -> Result<()> {
        if schema.type_name().trim().is_empty() {
            return Err(ConfigError::config("Configuration type name cannot be empty"));
        }

        let mut seen = HashSet::new();
        for field in schema.fields() {
            if field.name().trim().is_empty() {
                return Err(ConfigError::config(format!(
                    "{} declares a field with an empty name",
                    schema.type_name()
                )));
            }
            if !seen.insert(field.name()) {
                return Err(ConfigError::config(format!(
                    "{} declares field '{}' more than once",
                    schema.type_name(),
                    field.name()
                )));
            }
        }
        Ok(())
    }

    /// Check one field's descriptor and options
    pub fn check_field(field: &FieldSpec) -> Result<Vec<ValidationWarning>> {
        Self::check_descriptor(field.name(), field.descriptor())?;

        let mut warnings = Vec::new();

        if let Some(env_var) = field.explicit_env_var() {
            if env_var.is_empty() {
                return Err(ConfigError::config(format!("Field '{}' has an empty variable name", field.name())));
            }
            if env_var.chars().any(|c| c.is_ascii_lowercase()) {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Field '{}' reads lower-case variable '{}'", field.name(), env_var),
                ));
            }
        }

        if field.default().is_some() {
            if field.descriptor().raw_name() == crate::types::names::OPTION {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Optional field '{}' has a default and can never be empty", field.name()),
                ));
            }
            if field.is_secret() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Secret field '{}' has a default value", field.name()),
                ));
            }
        }

        warnings.extend(Self::enum_warnings(field.name(), field.descriptor()));
        Ok(warnings)
    }

    fn check_descriptor(field: &str, descriptor: &TypeDescriptor) -> Result<()> {
        match descriptor {
            TypeDescriptor::Wildcard | TypeDescriptor::Variable(_) => Err(ConfigError::unsupported(format!(
                "field '{}' has unresolved type '{}'",
                field, descriptor
            ))),
            TypeDescriptor::Simple(name) if name.trim().is_empty() => {
                Err(ConfigError::unsupported(format!("field '{}' has an empty type name", field)))
            }
            TypeDescriptor::Simple(_) => Ok(()),
            TypeDescriptor::Array(component) => match component.as_ref() {
                TypeDescriptor::Parameterized { .. } | TypeDescriptor::Wildcard | TypeDescriptor::Variable(_) => {
                    Err(ConfigError::unsupported(format!(
                        "field '{}' is a generic array '{}'",
                        field, descriptor
                    )))
                }
                other => Self::check_descriptor(field, other),
            },
            TypeDescriptor::Enum(e) if e.constants().is_empty() => Err(ConfigError::unsupported(format!(
                "field '{}' uses enum '{}' with no constants",
                field,
                e.name()
            ))),
            TypeDescriptor::Enum(_) => Ok(()),
            TypeDescriptor::Parameterized { args, .. } => {
                if args.is_empty() || args.len() > 2 {
                    return Err(ConfigError::unsupported(format!(
                        "field '{}' has type '{}' with {} type arguments, expected 1 or 2",
                        field,
                        descriptor,
                        args.len()
                    )));
                }
                args.iter().try_for_each(|arg| Self::check_descriptor(field, arg))
            }
        }
    }

    fn enum_warnings(field: &str, descriptor: &TypeDescriptor) -> Vec<ValidationWarning> {
        match descriptor {
            TypeDescriptor::Enum(e) => {
                let mut seen = HashSet::new();
                e.constants()
                    .iter()
                    .filter(|c| !seen.insert(c.as_str()))
                    .map(|c| {
                        ValidationWarning::new(
                            ValidationLevel::Warning,
                            format!("Field '{}': enum '{}' repeats constant '{}'", field, e.name(), c),
                        )
                    })
                    .collect()
            }
            TypeDescriptor::Array(component) => Self::enum_warnings(field, component),
            TypeDescriptor::Parameterized { args, .. } => {
                args.iter().flat_map(|arg| Self::enum_warnings(field, arg)).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// Schema validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            use colored::Colorize;
            let label = match self.level {
                ValidationLevel::Info => self.level.as_str().blue(),
                ValidationLevel::Warning => self.level.as_str().yellow(),
                ValidationLevel::Error => self.level.as_str().red(),
            };
            format!("[{}] {}", label, self.message)
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

/// Convenience function for schema validation
pub fn validate_schema(schema: &ConfigSchema) -> Result<Vec<ValidationWarning>> {
    SchemaValidator::validate_schema(schema)
}
