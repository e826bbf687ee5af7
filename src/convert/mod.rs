//! Type-directed conversion of raw strings into values
//!
//! [`TypeConverter`] decomposes a [`TypeDescriptor`], finds the parser for it
//! in a [`ParserRegistry`] and hands itself to that parser so generic
//! containers can convert their elements recursively.

pub mod tokenizer;

pub use tokenizer::{tokenize, Tokens};

use crate::error::{ConfigError, Result};
use crate::models::Value;
use crate::registry::{ParserRegistry, ValueParser};
use crate::types::{names, TypeDescriptor};
use std::slice;
use std::sync::Arc;

/// Anything able to convert a raw string to the value a descriptor asks for
pub trait Converter {
    fn convert(&self, descriptor: &TypeDescriptor, raw: &str) -> Result<Value>;
}

/// Registry-backed converter
#[derive(Debug, Clone, Copy)]
pub struct TypeConverter<'r> {
    registry: &'r ParserRegistry,
}

impl<'r> TypeConverter<'r> {
    /// Create a new converter over a fully populated registry
    pub fn new(registry: &'r ParserRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r ParserRegistry {
        self.registry
    }

    fn required(&self, key: &str, descriptor: &TypeDescriptor) -> Result<Arc<dyn ValueParser>> {
        self.registry
            .lookup_key(key)
            .ok_or_else(|| ConfigError::missing_parser(descriptor))
    }

    /// Parser registered for the exact descriptor, if any
    fn exact(&self, descriptor: &TypeDescriptor) -> Option<Arc<dyn ValueParser>> {
        self.registry.lookup(descriptor)
    }
}

impl Converter for TypeConverter<'_> {
    fn convert(&self, descriptor: &TypeDescriptor, raw: &str) -> Result<Value> {
        match descriptor {
            TypeDescriptor::Simple(name) => self.required(name, descriptor)?.parse(raw, self, &[]),
            TypeDescriptor::Array(component) => match self.exact(descriptor) {
                Some(parser) => parser.parse(raw, self, &[]),
                None => self
                    .required(names::ARRAY, descriptor)?
                    .parse(raw, self, slice::from_ref(component.as_ref())),
            },
            TypeDescriptor::Enum(_) => match self.exact(descriptor) {
                Some(parser) => parser.parse(raw, self, &[]),
                None => self
                    .required(names::ENUM, descriptor)?
                    .parse(raw, self, slice::from_ref(descriptor)),
            },
            TypeDescriptor::Parameterized { raw: name, args } => match self.exact(descriptor) {
                Some(parser) => parser.parse(raw, self, &[]),
                None => self.required(name, descriptor)?.parse(raw, self, args),
            },
            TypeDescriptor::Wildcard | TypeDescriptor::Variable(_) => Err(ConfigError::unsupported(format!(
                "cannot convert to unresolved type '{}'",
                descriptor
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueErrorKind;
    use crate::models::EnumConstant;
    use std::collections::BTreeSet;

    fn descriptor(text: &str) -> TypeDescriptor {
        text.parse().unwrap()
    }

    #[test]
    fn test_simple_dispatch() {
        let registry = ParserRegistry::new();
        let converter = TypeConverter::new(&registry);
        assert_eq!(converter.convert(&descriptor("i32"), "42").unwrap(), Value::I32(42));
        assert_eq!(converter.convert(&descriptor("integer"), "42").unwrap(), Value::I32(42));
        assert_eq!(converter.convert(&descriptor("string"), "x").unwrap(), Value::from("x"));
    }

    #[test]
    fn test_parameterized_dispatch_recurses() {
        let registry = ParserRegistry::new();
        let converter = TypeConverter::new(&registry);

        let value = converter.convert(&descriptor("list<list<i32>>"), "1,2").unwrap();
        assert_eq!(
            value,
            Value::List(vec![Value::List(vec![Value::I32(1)]), Value::List(vec![Value::I32(2)])])
        );

        let value = converter.convert(&descriptor("set<i32>"), "4,3,2,1,1").unwrap();
        let expected: BTreeSet<Value> = (1..=4).map(Value::I32).collect();
        assert_eq!(value, Value::Set(expected));
    }

    #[test]
    fn test_array_and_enum_dispatch() {
        let registry = ParserRegistry::new();
        let converter = TypeConverter::new(&registry);

        let value = converter.convert(&descriptor("[i32]"), "1,2,3,4").unwrap();
        assert_eq!(
            value,
            Value::Array {
                component: TypeDescriptor::simple("i32"),
                items: (1..=4).map(Value::I32).collect(),
            }
        );

        let time_unit = descriptor("TimeUnit{DAYS|HOURS|MINUTES}");
        assert_eq!(
            converter.convert(&time_unit, "DAYS").unwrap(),
            Value::Enum(EnumConstant::new("TimeUnit", "DAYS"))
        );
        let error = converter.convert(&time_unit, "bogus").unwrap_err();
        assert_eq!(error.value_kind(), Some(ValueErrorKind::IllegalValue));
    }

    #[test]
    fn test_unknown_descriptor_is_missing_parser() {
        let registry = ParserRegistry::new();
        let converter = TypeConverter::new(&registry);

        let error = converter.convert(&descriptor("Money"), "12.50").unwrap_err();
        assert!(matches!(error, ConfigError::MissingParser { .. }));
        assert!(!error.is_value_error());

        let error = converter.convert(&descriptor("queue<i32>"), "1").unwrap_err();
        assert!(matches!(error, ConfigError::MissingParser { .. }));
    }

    #[test]
    fn test_unresolved_descriptors_are_rejected() {
        let registry = ParserRegistry::new();
        let converter = TypeConverter::new(&registry);

        assert!(matches!(
            converter.convert(&TypeDescriptor::Wildcard, "x"),
            Err(ConfigError::UnsupportedDescriptor(_))
        ));
        assert!(matches!(
            converter.convert(&descriptor("list<'T>"), "x"),
            Err(ConfigError::UnsupportedDescriptor(_))
        ));
    }

    #[test]
    fn test_exact_entry_wins_over_generic_parser() {
        let mut registry = ParserRegistry::new();
        registry
            .register_fn(descriptor("list<i32>"), |raw: &str, _: &dyn Converter, _: &[TypeDescriptor]| {
                Ok(Value::List(raw.split(';').map(|s| Value::from(s)).collect()))
            })
            .unwrap();
        let converter = TypeConverter::new(&registry);

        let value = converter.convert(&descriptor("list<i32>"), "a;b").unwrap();
        assert_eq!(value, Value::List(vec![Value::from("a"), Value::from("b")]));

        // other element types still go through the generic list parser
        let value = converter.convert(&descriptor("list<i64>"), "1,2").unwrap();
        assert_eq!(value, Value::List(vec![Value::I64(1), Value::I64(2)]));
    }
}
