//! Declared configuration shapes

use crate::registry::ParserRegistration;
use crate::types::TypeDescriptor;

/// One declared configuration field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    descriptor: TypeDescriptor,
    env_var: Option<String>,
    split_words: bool,
    default_value: Option<String>,
    secret: bool,
    parsers: Vec<ParserRegistration>,
}

impl FieldSpec {
    /// Declare a field by name and target descriptor
    pub fn new<S: Into<String>>(name: S, descriptor: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
            env_var: None,
            split_words: true,
            default_value: None,
            secret: false,
            parsers: Vec::new(),
        }
    }

    /// Read the field from exactly this variable, bypassing name derivation
    pub fn env_var<S: Into<String>>(mut self, name: S) -> Self {
        self.env_var = Some(name.into());
        self
    }

    /// Whether camelCase words of the name are joined with `_`
    pub fn split_words(mut self, split: bool) -> Self {
        self.split_words = split;
        self
    }

    /// Raw text converted when the source has no value for the field
    pub fn default_value<S: Into<String>>(mut self, value: S) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Mask the field's value in logs and reports
    pub fn secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    /// Parser used for this field only, on top of the schema's parsers
    pub fn custom_parser(mut self, registration: ParserRegistration) -> Self {
        self.parsers.push(registration);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn explicit_env_var(&self) -> Option<&str> {
        self.env_var.as_deref()
    }

    pub fn splits_words(&self) -> bool {
        self.split_words
    }

    pub fn default(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }

    pub fn parsers(&self) -> &[ParserRegistration] {
        &self.parsers
    }
}

/// The full declaration of a configuration type
#[derive(Debug, Clone)]
pub struct ConfigSchema {
    type_name: String,
    fields: Vec<FieldSpec>,
    parsers: Vec<ParserRegistration>,
}

impl ConfigSchema {
    pub fn new<S: Into<String>>(type_name: S) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
            parsers: Vec::new(),
        }
    }

    /// Add a field; fields are bound in declaration order
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Parser applied to every field of the schema
    pub fn custom_parser(mut self, registration: ParserRegistration) -> Self {
        self.parsers.push(registration);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn parsers(&self) -> &[ParserRegistration] {
        &self.parsers
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
