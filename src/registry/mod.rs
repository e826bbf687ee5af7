//! Parser registry: descriptor keys mapped to value parsers
//!
//! A registry is seeded with the built-in parsers, extended with custom
//! parsers, and then only read. Mutation takes `&mut self`, so the
//! populate-then-read discipline is enforced by the borrow checker.

mod builtins;
mod temporal;

use crate::convert::Converter;
use crate::error::Result;
use crate::models::Value;
use crate::types::{linked_name, Describe, TypeDescriptor};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Converts a raw string into a value
///
/// `args` are the type arguments of the descriptor being converted (element
/// type of a list, key and value types of a map, ...). Parsers for generic
/// types call back into `converter` for each argument.
pub trait ValueParser: Send + Sync {
    fn parse(&self, raw: &str, converter: &dyn Converter, args: &[TypeDescriptor]) -> Result<Value>;
}

impl<F> ValueParser for F
where
    F: Fn(&str, &dyn Converter, &[TypeDescriptor]) -> Result<Value> + Send + Sync,
{
    fn parse(&self, raw: &str, converter: &dyn Converter, args: &[TypeDescriptor]) -> Result<Value> {
        self(raw, converter, args)
    }
}

/// A user-supplied parser whose produced type is its `Output`
///
/// ```
/// use typed_envconfig::convert::Converter;
/// use typed_envconfig::registry::{CustomParser, ParserRegistry};
/// use typed_envconfig::types::TypeDescriptor;
/// use typed_envconfig::Result;
///
/// struct Doubled;
///
/// impl CustomParser for Doubled {
///     type Output = i32;
///
///     fn parse(&self, raw: &str, converter: &dyn Converter, _: &[TypeDescriptor]) -> Result<i32> {
///         let value = converter.convert(&TypeDescriptor::simple("i64"), raw)?;
///         Ok(value.extract::<i64>().map_or(0, |v| (v * 2) as i32))
///     }
/// }
///
/// let mut registry = ParserRegistry::new();
/// registry.register(Doubled).unwrap();
/// assert!(registry.contains(&TypeDescriptor::simple("integer")));
/// ```
pub trait CustomParser: Send + Sync + 'static {
    type Output: Describe + Into<Value>;

    fn parse(&self, raw: &str, converter: &dyn Converter, args: &[TypeDescriptor]) -> Result<Self::Output>;
}

struct CustomAdapter<P>(P);

impl<P: CustomParser> ValueParser for CustomAdapter<P> {
    fn parse(&self, raw: &str, converter: &dyn Converter, args: &[TypeDescriptor]) -> Result<Value> {
        self.0.parse(raw, converter, args).map(Into::into)
    }
}

/// A parser paired with the descriptor it produces
#[derive(Clone)]
pub struct ParserRegistration {
    produced: TypeDescriptor,
    parser: Arc<dyn ValueParser>,
}

impl ParserRegistration {
    /// Registration for a custom parser, produced type taken from its `Output`
    pub fn of<P: CustomParser>(parser: P) -> Self {
        Self {
            produced: <P::Output as Describe>::descriptor(),
            parser: Arc::new(CustomAdapter(parser)),
        }
    }

    /// Registration under an explicit descriptor
    pub fn with_descriptor<P: ValueParser + 'static>(produced: TypeDescriptor, parser: P) -> Self {
        Self {
            produced,
            parser: Arc::new(parser),
        }
    }

    pub fn produced(&self) -> &TypeDescriptor {
        &self.produced
    }
}

impl fmt::Debug for ParserRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistration")
            .field("produced", &self.produced.to_string())
            .finish_non_exhaustive()
    }
}

/// Lookup table from descriptor key to parser
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn ValueParser>>,
}

impl ParserRegistry {
    /// Create a registry seeded with every built-in parser
    pub fn new() -> Self {
        let mut registry = Self::empty();
        builtins::register_builtins(&mut registry);
        registry
    }

    /// Create a registry with no parsers at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store `parser` under `key` and under its scalar alias, if any
    pub(crate) fn insert(&mut self, key: &str, parser: Arc<dyn ValueParser>) {
        if let Some(linked) = linked_name(key) {
            self.parsers.insert(linked.to_string(), Arc::clone(&parser));
        }
        self.parsers.insert(key.to_string(), parser);
    }

    /// Register a custom parser, replacing any parser for the same produced type
    pub fn register<P: CustomParser>(&mut self, parser: P) -> Result<()> {
        self.apply(ParserRegistration::of(parser))
    }

    /// Register a closure producing values of `produced`
    pub fn register_fn<F>(&mut self, produced: TypeDescriptor, parser: F) -> Result<()>
    where
        F: Fn(&str, &dyn Converter, &[TypeDescriptor]) -> Result<Value> + Send + Sync + 'static,
    {
        self.apply(ParserRegistration::with_descriptor(produced, parser))
    }

    /// Apply a prepared registration
    pub fn apply(&mut self, registration: ParserRegistration) -> Result<()> {
        let key = registration.produced.registry_key()?;
        self.insert(&key, registration.parser);
        Ok(())
    }

    /// Apply several registrations in order; later ones win
    pub fn apply_all<'a, I>(&mut self, registrations: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a ParserRegistration>,
    {
        for registration in registrations {
            self.apply(registration.clone())?;
        }
        Ok(())
    }

    /// Parser registered for exactly this descriptor
    pub fn lookup(&self, descriptor: &TypeDescriptor) -> Option<Arc<dyn ValueParser>> {
        let key = match descriptor {
            TypeDescriptor::Enum(e) => e.name().to_string(),
            TypeDescriptor::Wildcard | TypeDescriptor::Variable(_) => return None,
            other => other.to_string(),
        };
        self.lookup_key(&key)
    }

    /// Parser registered under a raw key such as `list` or `i32`
    pub fn lookup_key(&self, key: &str) -> Option<Arc<dyn ValueParser>> {
        self.parsers.get(key).cloned()
    }

    pub fn contains(&self, descriptor: &TypeDescriptor) -> bool {
        self.lookup(descriptor).is_some()
    }

    /// Every registered key, sorted
    pub fn registered_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::TypeConverter;
    use crate::error::ConfigError;
    use crate::types::names;

    struct Constant;

    impl CustomParser for Constant {
        type Output = i32;

        fn parse(&self, _raw: &str, _converter: &dyn Converter, _args: &[TypeDescriptor]) -> Result<i32> {
            Ok(7)
        }
    }

    #[test]
    fn test_new_registry_has_builtins() {
        let registry = ParserRegistry::new();
        for name in [names::BOOL, names::I32, names::STRING, names::DURATION, names::LIST, names::ARRAY, names::ENUM] {
            assert!(registry.lookup_key(name).is_some(), "missing built-in {}", name);
        }
        assert!(registry.lookup_key("boolean").is_some());
        assert!(ParserRegistry::empty().is_empty());
    }

    #[test]
    fn test_lookup_never_fabricates() {
        let registry = ParserRegistry::new();
        assert!(registry.lookup(&TypeDescriptor::simple("Money")).is_none());
        assert!(registry.lookup(&TypeDescriptor::Wildcard).is_none());
        assert!(registry.lookup(&TypeDescriptor::list(TypeDescriptor::simple("i32"))).is_none());
    }

    #[test]
    fn test_custom_parser_overrides_builtin_under_both_names() {
        let mut registry = ParserRegistry::new();
        registry.register(Constant).unwrap();
        let converter = TypeConverter::new(&registry);

        for (name, raw) in [("i32", "1"), ("integer", "2"), ("i32", "not a number"), ("integer", "")] {
            let value = converter.convert(&TypeDescriptor::simple(name), raw).unwrap();
            assert_eq!(value, Value::I32(7));
        }
        // unrelated types keep their built-in parser
        let value = converter.convert(&TypeDescriptor::simple("i64"), "1").unwrap();
        assert_eq!(value, Value::I64(1));
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut registry = ParserRegistry::new();
        let produced = TypeDescriptor::simple("Money");
        registry
            .register_fn(produced.clone(), |_: &str, _: &dyn Converter, _: &[TypeDescriptor]| Ok(Value::I32(1)))
            .unwrap();
        registry
            .register_fn(produced.clone(), |_: &str, _: &dyn Converter, _: &[TypeDescriptor]| Ok(Value::I32(2)))
            .unwrap();

        let converter = TypeConverter::new(&registry);
        assert_eq!(converter.convert(&produced, "x").unwrap(), Value::I32(2));
    }

    #[test]
    fn test_registration_of_unresolved_type_fails_fast() {
        let mut registry = ParserRegistry::new();
        let before = registry.len();
        let error = registry
            .register_fn(
                TypeDescriptor::list(TypeDescriptor::Variable("T".to_string())),
                |_: &str, _: &dyn Converter, _: &[TypeDescriptor]| Ok(Value::Bool(true)),
            )
            .unwrap_err();

        assert!(matches!(error, ConfigError::Registration(_)));
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_registration_debug_shows_produced_type() {
        let registration = ParserRegistration::of(Constant);
        assert_eq!(registration.produced(), &TypeDescriptor::simple("i32"));
        assert!(format!("{:?}", registration).contains("i32"));
    }
}
