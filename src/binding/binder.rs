//! Eager binding of a schema against a source

use super::naming::{EnvVarNaming, NamingPolicy};
use super::schema::{ConfigSchema, FieldSpec};
use super::source::ConfigSource;
use crate::config::validation::SchemaValidator;
use crate::convert::{Converter, TypeConverter};
use crate::error::{ConfigError, FieldFailure, Result};
use crate::logging::{BindingLogger, Logger};
use crate::models::{FromValue, Settings, Value};
use crate::registry::ParserRegistry;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Where a field's raw text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueOrigin {
    /// The source had the key, possibly with an empty value
    Source,
    /// The field's declared default
    Default,
    /// Neither; converted as the empty string
    Absent,
}

impl ValueOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Default => "default",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw text for a field: the source value if the key exists (even when
/// empty), else a non-empty default, else the empty string
pub fn resolve_raw_value(from_source: Option<String>, default: Option<&str>) -> (String, ValueOrigin) {
    match (from_source, default) {
        (Some(raw), _) => (raw, ValueOrigin::Source),
        (None, Some(default)) if !default.is_empty() => (default.to_string(), ValueOrigin::Default),
        _ => (String::new(), ValueOrigin::Absent),
    }
}

/// Binds every field of a schema in one pass
pub struct Binder {
    schema: ConfigSchema,
    prefix: Option<String>,
    naming: Box<dyn NamingPolicy>,
    logger: BindingLogger,
}

impl Binder {
    pub fn new(schema: ConfigSchema) -> Self {
        Self {
            schema,
            prefix: None,
            naming: Box::new(EnvVarNaming),
            logger: BindingLogger::new(Logger::new("BINDER"), crate::defaults::DEFAULT_MASK_SECRETS),
        }
    }

    /// Prefix applied to every derived variable name; empty means none
    pub fn prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        self.prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    /// Replace the naming policy
    pub fn naming<N: NamingPolicy + 'static>(mut self, naming: N) -> Self {
        self.naming = Box::new(naming);
        self
    }

    /// Take logging, masking and prefix from settings
    pub fn settings(mut self, settings: &Settings) -> Self {
        self.logger = BindingLogger::new(settings.logger("BINDER"), settings.mask_secrets);
        if let Some(prefix) = &settings.prefix {
            self.prefix = Some(prefix.clone());
        }
        self
    }

    /// Log through `logger`, keeping the current masking setting
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = BindingLogger::new(logger, self.logger.masks_secrets());
        self
    }

    pub fn schema(&self) -> &ConfigSchema {
        &self.schema
    }

    /// Variable name a field is read from
    pub fn env_var_name(&self, field: &FieldSpec) -> String {
        self.naming.env_var_name(self.prefix.as_deref(), field)
    }

    /// Convert every field, failing with all field errors at once
    pub fn bind<S: ConfigSource + ?Sized>(&self, source: &S) -> Result<BoundConfig> {
        SchemaValidator::check_structure(&self.schema)?;

        let type_name = self.schema.type_name();
        let correlation_id = self.logger.start_pass(type_name, self.schema.fields().len());

        let mut base = ParserRegistry::new();
        base.apply_all(self.schema.parsers())?;

        let mut fields = Vec::with_capacity(self.schema.fields().len());
        let mut failures = Vec::new();

        for spec in self.schema.fields() {
            let env_var = self.env_var_name(spec);
            let (raw, origin) = resolve_raw_value(source.get(&env_var), spec.default());
            let raw_for_log = (origin != ValueOrigin::Absent).then_some(raw.as_str());
            self.logger
                .log_field_resolved(&correlation_id, spec.name(), &env_var, origin.as_str(), raw_for_log, spec.is_secret());

            match self.convert_field(&base, spec, &raw) {
                Ok(value) => fields.push(BoundField {
                    name: spec.name().to_string(),
                    env_var,
                    origin,
                    secret: spec.is_secret(),
                    value,
                }),
                Err(error) => {
                    let error = if spec.is_secret() && self.logger.masks_secrets() {
                        error.redact(crate::defaults::SECRET_MASK)
                    } else {
                        error
                    };
                    self.logger.log_field_failure(&correlation_id, spec.name(), &env_var, &error);
                    let shown = (origin != ValueOrigin::Absent)
                        .then(|| self.logger.display_value(&raw, spec.is_secret()).to_string());
                    failures.push(FieldFailure {
                        field: spec.name().to_string(),
                        env_var,
                        raw: shown,
                        error,
                    });
                }
            }
        }

        self.logger
            .finish_pass(&correlation_id, type_name, fields.len(), failures.len());

        if !failures.is_empty() {
            return Err(ConfigError::Binding {
                config: type_name.to_string(),
                failures,
            });
        }

        Ok(BoundConfig {
            type_name: type_name.to_string(),
            prefix: self.prefix.clone(),
            fields,
        })
    }

    fn convert_field(&self, base: &ParserRegistry, spec: &FieldSpec, raw: &str) -> Result<Value> {
        SchemaValidator::check_field(spec)?;

        let registry = if spec.parsers().is_empty() {
            Cow::Borrowed(base)
        } else {
            let mut own = base.clone();
            own.apply_all(spec.parsers())?;
            Cow::Owned(own)
        };

        TypeConverter::new(&registry).convert(spec.descriptor(), raw)
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("schema", &self.schema.type_name())
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// A successfully converted field
#[derive(Debug, Clone, PartialEq)]
pub struct BoundField {
    pub name: String,
    pub env_var: String,
    pub origin: ValueOrigin,
    pub secret: bool,
    pub value: Value,
}

/// Immutable result of a binding pass; every field converted exactly once
#[derive(Debug, Clone, PartialEq)]
pub struct BoundConfig {
    type_name: String,
    prefix: Option<String>,
    fields: Vec<BoundField>,
}

impl BoundConfig {
    fn field(&self, name: &str) -> Result<&BoundField> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ConfigError::UnknownField(name.to_string()))
    }

    /// Converted value of a field
    pub fn value(&self, name: &str) -> Result<&Value> {
        self.field(name).map(|f| &f.value)
    }

    /// Converted value of a field as a Rust type
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self.value(name)?;
        T::from_value(value).ok_or_else(|| ConfigError::TypeMismatch {
            field: name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
            found: value.kind_name().to_string(),
        })
    }

    /// Variable a field was read from
    pub fn env_var(&self, name: &str) -> Result<&str> {
        self.field(name).map(|f| f.env_var.as_str())
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A Rust type backed by a configuration schema
///
/// Usually implemented with [`env_config!`](crate::env_config).
pub trait EnvConfig: Sized {
    fn schema() -> ConfigSchema;

    fn from_bound(bound: &BoundConfig) -> Result<Self>;

    /// Bind from `source` without a prefix
    fn from_source<S: ConfigSource + ?Sized>(source: &S) -> Result<Self> {
        let bound = Binder::new(Self::schema()).bind(source)?;
        Self::from_bound(&bound)
    }

    /// Bind from `source`, deriving names under `prefix`
    fn from_source_with_prefix<S: ConfigSource + ?Sized>(source: &S, prefix: &str) -> Result<Self> {
        let bound = Binder::new(Self::schema()).prefix(prefix).bind(source)?;
        Self::from_bound(&bound)
    }
}
