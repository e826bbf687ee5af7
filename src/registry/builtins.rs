//! Built-in value parsers

use super::{temporal, ParserRegistry, ValueParser};
use crate::convert::{tokenize, Converter};
use crate::defaults::{LIST_SEPARATOR, MAP_ENTRY_SEPARATOR};
use crate::error::{ConfigError, Result, ValueErrorKind};
use crate::models::{EnumConstant, Uri, Value};
use crate::types::{names, TypeDescriptor};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Pins a closure to the higher-ranked parser signature
pub(super) fn parser_fn<F>(f: F) -> F
where
    F: Fn(&str, &dyn Converter, &[TypeDescriptor]) -> Result<Value> + Send + Sync + 'static,
{
    f
}

pub(super) fn register_builtins(registry: &mut ParserRegistry) {
    register_scalar_types(registry);
    register_text_types(registry);
    register_container_types(registry);
    temporal::register_temporal_types(registry);
}

fn add<P: ValueParser + 'static>(registry: &mut ParserRegistry, name: &str, parser: P) {
    registry.insert(name, Arc::new(parser));
}

/// Parser delegating to `FromStr`, failing with `kind` on empty or malformed input
fn from_str_parser<T>(target: &'static str, kind: ValueErrorKind) -> impl ValueParser
where
    T: FromStr + Into<Value> + 'static,
    T::Err: fmt::Display,
{
    parser_fn(move |raw: &str, _: &dyn Converter, _: &[TypeDescriptor]| {
        if raw.is_empty() {
            return Err(ConfigError::malformed(target, raw, kind, "empty input"));
        }
        raw.parse::<T>()
            .map(Into::into)
            .map_err(|e| ConfigError::malformed(target, raw, kind, e.to_string()))
    })
}

fn register_scalar_types(registry: &mut ParserRegistry) {
    use ValueErrorKind::NumberFormat;

    add(registry, names::BOOL, parse_bool);
    add(registry, names::I8, from_str_parser::<i8>(names::I8, NumberFormat));
    add(registry, names::I16, from_str_parser::<i16>(names::I16, NumberFormat));
    add(registry, names::I32, from_str_parser::<i32>(names::I32, NumberFormat));
    add(registry, names::I64, from_str_parser::<i64>(names::I64, NumberFormat));
    add(registry, names::I128, from_str_parser::<i128>(names::I128, NumberFormat));
    add(registry, names::U8, from_str_parser::<u8>(names::U8, NumberFormat));
    add(registry, names::U16, from_str_parser::<u16>(names::U16, NumberFormat));
    add(registry, names::U32, from_str_parser::<u32>(names::U32, NumberFormat));
    add(registry, names::U64, from_str_parser::<u64>(names::U64, NumberFormat));
    add(registry, names::U128, from_str_parser::<u128>(names::U128, NumberFormat));
    add(registry, names::F32, from_str_parser::<f32>(names::F32, NumberFormat));
    add(registry, names::F64, from_str_parser::<f64>(names::F64, NumberFormat));
    add(registry, names::BIG_INT, from_str_parser::<BigInt>(names::BIG_INT, NumberFormat));
    add(registry, names::BIG_DECIMAL, from_str_parser::<BigDecimal>(names::BIG_DECIMAL, NumberFormat));
}

fn register_text_types(registry: &mut ParserRegistry) {
    add(registry, names::STRING, parse_string);
    add(registry, names::CHAR, parse_char);
    add(registry, names::URL, from_str_parser::<url::Url>(names::URL, ValueErrorKind::IllegalArgument));
    add(registry, names::URI, from_str_parser::<Uri>(names::URI, ValueErrorKind::IllegalArgument));
    add(registry, names::ENUM, parse_enum);
}

fn register_container_types(registry: &mut ParserRegistry) {
    add(registry, names::OPTION, parse_option);
    add(registry, names::LIST, parse_list);
    add(registry, names::SET, parse_set);
    add(registry, names::ARRAY, parse_array);
    add(registry, names::MAP, parse_map);
}

/// Case-insensitive `true`/`false`; anything else is an error
fn parse_bool(raw: &str, _: &dyn Converter, _: &[TypeDescriptor]) -> Result<Value> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else if raw.is_empty() {
        Err(ConfigError::malformed(names::BOOL, raw, ValueErrorKind::MissingValue, "missing value"))
    } else {
        Err(ConfigError::malformed(
            names::BOOL,
            raw,
            ValueErrorKind::InvalidBoolean,
            "expected 'true' or 'false'",
        ))
    }
}

fn parse_string(raw: &str, _: &dyn Converter, _: &[TypeDescriptor]) -> Result<Value> {
    if raw.is_empty() {
        return Err(ConfigError::malformed(names::STRING, raw, ValueErrorKind::MissingValue, "missing value"));
    }
    Ok(Value::String(raw.to_string()))
}

fn parse_char(raw: &str, _: &dyn Converter, _: &[TypeDescriptor]) -> Result<Value> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::Char(c)),
        _ => Err(ConfigError::malformed(
            names::CHAR,
            raw,
            ValueErrorKind::IllegalArgument,
            "expected exactly one character",
        )),
    }
}

fn parse_enum(raw: &str, _: &dyn Converter, args: &[TypeDescriptor]) -> Result<Value> {
    let descriptor = match args {
        [TypeDescriptor::Enum(descriptor)] => descriptor,
        [other] => return Err(ConfigError::unsupported(format!("'{}' is not an enum type", other))),
        _ => return Err(arity_error(names::ENUM, 1, args.len())),
    };
    match descriptor.constant(raw) {
        Some(constant) => Ok(Value::Enum(EnumConstant::new(descriptor.name(), constant))),
        None if raw.is_empty() => Err(ConfigError::malformed(
            descriptor.name(),
            raw,
            ValueErrorKind::IllegalValue,
            "missing enum constant",
        )),
        None => Err(ConfigError::malformed(
            descriptor.name(),
            raw,
            ValueErrorKind::IllegalValue,
            format!("no constant named '{}' (expected one of {})", raw, descriptor.constants().join(", ")),
        )),
    }
}

fn arity_error(target: &str, expected: usize, got: usize) -> ConfigError {
    ConfigError::unsupported(format!("{} expects {} type argument(s), got {}", target, expected, got))
}

/// Convert one element, wrapping bad-input failures with its position
fn convert_element(
    converter: &dyn Converter,
    target: &TypeDescriptor,
    element_type: &TypeDescriptor,
    position: usize,
    element: &str,
) -> Result<Value> {
    converter.convert(element_type, element).map_err(|e| {
        if e.is_value_error() {
            ConfigError::container(target.to_string(), position, element, e)
        } else {
            e
        }
    })
}

fn convert_elements(
    raw: &str,
    converter: &dyn Converter,
    target: &TypeDescriptor,
    element_type: &TypeDescriptor,
) -> Result<Vec<Value>> {
    tokenize(raw, LIST_SEPARATOR)
        .enumerate()
        .map(|(position, token)| convert_element(converter, target, element_type, position, token))
        .collect()
}

/// Empty input is the "no value" state
fn parse_option(raw: &str, converter: &dyn Converter, args: &[TypeDescriptor]) -> Result<Value> {
    let [inner] = args else {
        return Err(arity_error(names::OPTION, 1, args.len()));
    };
    if raw.is_empty() {
        return Ok(Value::Optional(None));
    }
    let value = converter.convert(inner, raw)?;
    Ok(Value::Optional(Some(Box::new(value))))
}

fn parse_list(raw: &str, converter: &dyn Converter, args: &[TypeDescriptor]) -> Result<Value> {
    let [element] = args else {
        return Err(arity_error(names::LIST, 1, args.len()));
    };
    let target = TypeDescriptor::list(element.clone());
    convert_elements(raw, converter, &target, element).map(Value::List)
}

fn parse_set(raw: &str, converter: &dyn Converter, args: &[TypeDescriptor]) -> Result<Value> {
    let [element] = args else {
        return Err(arity_error(names::SET, 1, args.len()));
    };
    let target = TypeDescriptor::set(element.clone());
    let items = convert_elements(raw, converter, &target, element)?;
    Ok(Value::Set(items.into_iter().collect::<BTreeSet<_>>()))
}

fn parse_array(raw: &str, converter: &dyn Converter, args: &[TypeDescriptor]) -> Result<Value> {
    let [component] = args else {
        return Err(arity_error(names::ARRAY, 1, args.len()));
    };
    let target = TypeDescriptor::array(component.clone());
    let items = convert_elements(raw, converter, &target, component)?;
    Ok(Value::Array {
        component: component.clone(),
        items,
    })
}

/// `k:v,k:v`; each entry must split into exactly two parts, last key wins
fn parse_map(raw: &str, converter: &dyn Converter, args: &[TypeDescriptor]) -> Result<Value> {
    let [key_type, value_type] = args else {
        return Err(arity_error(names::MAP, 2, args.len()));
    };
    let target = TypeDescriptor::map(key_type.clone(), value_type.clone());

    let mut entries = BTreeMap::new();
    for (position, entry) in tokenize(raw, LIST_SEPARATOR).enumerate() {
        let mut parts = tokenize(entry, MAP_ENTRY_SEPARATOR);
        let (key, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => (key, value),
            _ => {
                let cause = ConfigError::malformed(
                    target.to_string(),
                    entry,
                    ValueErrorKind::Structure,
                    format!("expected exactly one '{}' in a map entry", MAP_ENTRY_SEPARATOR),
                );
                return Err(ConfigError::container(target.to_string(), position, entry, cause));
            }
        };
        let key = convert_element(converter, &target, key_type, position, key)?;
        let value = convert_element(converter, &target, value_type, position, value)?;
        entries.insert(key, value);
    }
    Ok(Value::Map(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::TypeConverter;
    use proptest::prelude::*;

    fn convert(descriptor: &str, raw: &str) -> Result<Value> {
        let registry = ParserRegistry::new();
        let descriptor: TypeDescriptor = descriptor.parse().unwrap();
        TypeConverter::new(&registry).convert(&descriptor, raw)
    }

    #[test]
    fn test_boolean_rule() {
        assert_eq!(convert("bool", "true").unwrap(), Value::Bool(true));
        assert_eq!(convert("bool", "TRUE").unwrap(), Value::Bool(true));
        assert_eq!(convert("boolean", "False").unwrap(), Value::Bool(false));

        let invalid = convert("bool", "yes").unwrap_err();
        assert_eq!(invalid.value_kind(), Some(ValueErrorKind::InvalidBoolean));
        assert_eq!(convert("bool", "1").unwrap_err().value_kind(), Some(ValueErrorKind::InvalidBoolean));
        assert_eq!(convert("bool", " true").unwrap_err().value_kind(), Some(ValueErrorKind::InvalidBoolean));

        let empty = convert("bool", "").unwrap_err();
        assert_eq!(empty.value_kind(), Some(ValueErrorKind::MissingValue));
    }

    #[test]
    fn test_signed_byte_bounds() {
        assert_eq!(convert("i8", "127").unwrap(), Value::I8(127));
        assert_eq!(convert("i8", "-128").unwrap(), Value::I8(-128));
        for raw in ["128", "-129", "", "1.0", "x"] {
            let error = convert("byte", raw).unwrap_err();
            assert_eq!(error.value_kind(), Some(ValueErrorKind::NumberFormat), "{}", raw);
        }
    }

    #[test]
    fn test_arbitrary_precision() {
        let big = "123456789012345678901234567890";
        assert_eq!(convert("bigint", big).unwrap().to_string(), big);
        assert_eq!(
            convert("bigdecimal", "3.14159").unwrap(),
            Value::Decimal("3.14159".parse().unwrap())
        );
        assert!(convert("bigint", "1.5").is_err());
    }

    #[test]
    fn test_string_rejects_empty() {
        assert_eq!(convert("string", " padded ").unwrap(), Value::from(" padded "));
        let error = convert("string", "").unwrap_err();
        assert_eq!(error.value_kind(), Some(ValueErrorKind::MissingValue));
    }

    #[test]
    fn test_char() {
        assert_eq!(convert("char", "é").unwrap(), Value::Char('é'));
        assert!(convert("character", "").is_err());
        assert!(convert("char", "ab").is_err());
    }

    #[test]
    fn test_urls() {
        let value = convert("url", "https://example.com/path?q=1").unwrap();
        assert_eq!(value.to_string(), "https://example.com/path?q=1");
        assert!(matches!(convert("uri", "mailto:ops@example.com").unwrap(), Value::Uri(_)));

        let error = convert("url", "not a url").unwrap_err();
        assert_eq!(error.value_kind(), Some(ValueErrorKind::IllegalArgument));
        assert!(convert("url", "relative/path").is_err());
    }

    #[test]
    fn test_uri_accepts_relative_references() {
        for raw in ["relative/path", "../x", "/static/logo.png", "#top"] {
            let value = convert("uri", raw).unwrap();
            assert!(matches!(&value, Value::Uri(uri) if !uri.is_absolute()), "{}", raw);
            assert_eq!(value.to_string(), raw);
        }

        let error = convert("uri", "has space").unwrap_err();
        assert_eq!(error.value_kind(), Some(ValueErrorKind::IllegalArgument));
        let error = convert("uri", "").unwrap_err();
        assert_eq!(error.value_kind(), Some(ValueErrorKind::IllegalArgument));

        let list = convert("list<uri>", "../a,https://example.com/b").unwrap();
        assert_eq!(list.to_string(), "../a,https://example.com/b");
    }

    #[test]
    fn test_set_keeps_signed_zeros_apart() {
        let Value::Set(items) = convert("set<f64>", "0.0,-0.0,0.0").unwrap() else {
            panic!("expected a set");
        };
        assert_eq!(items.len(), 2);

        let Value::Set(items) = convert("set<double>", "NaN,NaN,1").unwrap() else {
            panic!("expected a set");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_optional() {
        assert_eq!(convert("option<i32>", "").unwrap(), Value::Optional(None));
        assert_eq!(convert("option<i32>", "5").unwrap(), Value::from(Some(5i32)));
        assert!(convert("option<i32>", "five").is_err());
    }

    #[test]
    fn test_list_and_array() {
        assert_eq!(convert("list<i32>", "1,2,3,4").unwrap(), Value::from(vec![1i32, 2, 3, 4]));
        assert_eq!(convert("list<string>", "foo,bar").unwrap().to_string(), "foo,bar");

        // an empty element is still an element
        let error = convert("list<string>", "foo,,bar").unwrap_err();
        match error {
            ConfigError::MalformedContainer { position, .. } => assert_eq!(position, 1),
            other => panic!("unexpected error {:?}", other),
        }

        let error = convert("[i32]", "").unwrap_err();
        assert!(matches!(error, ConfigError::MalformedContainer { position: 0, .. }));
        assert_eq!(error.value_kind(), Some(ValueErrorKind::NumberFormat));
        assert!(matches!(
            convert("list<i32>", "").unwrap_err(),
            ConfigError::MalformedContainer { position: 0, .. }
        ));
        assert_eq!(convert("list<option<i32>>", "").unwrap(), Value::List(vec![Value::Optional(None)]));
    }

    #[test]
    fn test_first_failure_aborts_container() {
        let error = convert("set<u8>", "1,300,abc").unwrap_err();
        match error {
            ConfigError::MalformedContainer { position, element, .. } => {
                assert_eq!(position, 1);
                assert_eq!(element, "300");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_map() {
        let value = convert("map<TimeUnit{DAYS|HOURS|MINUTES},i8>", "DAYS:1,HOURS:2,MINUTES:3").unwrap();
        let entries = match value {
            Value::Map(entries) => entries,
            other => panic!("unexpected value {:?}", other),
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[&Value::Enum(EnumConstant::new("TimeUnit", "HOURS"))], Value::I8(2));

        let last_wins = convert("map<string,i32>", "a:1,a:2").unwrap();
        assert_eq!(last_wins.to_string(), "a:2");
    }

    #[test]
    fn test_map_entries_need_exactly_two_parts() {
        for raw in ["DAYS1", "DAYS:1:2", "DAYS:1,HOURS"] {
            let error = convert("map<string,i32>", raw).unwrap_err();
            assert!(matches!(error, ConfigError::MalformedContainer { .. }), "{}", raw);
        }
        let error = convert("map<string,i32>", "a:1,b").unwrap_err();
        assert_eq!(error.value_kind(), Some(ValueErrorKind::Structure));
    }

    #[test]
    fn test_enum_edge_cases() {
        let error = convert("Color{RED|GREEN}", "").unwrap_err();
        assert_eq!(error.value_kind(), Some(ValueErrorKind::IllegalValue));
        assert!(convert("Color{RED|GREEN}", "red").is_err());
    }

    #[test]
    fn test_wrong_arity_is_a_declaration_error() {
        let error = convert("list<i32,i32>", "1").unwrap_err();
        assert!(matches!(error, ConfigError::UnsupportedDescriptor(_)));
        let error = convert("map<string>", "a:1").unwrap_err();
        assert!(matches!(error, ConfigError::UnsupportedDescriptor(_)));
    }

    #[test]
    fn test_missing_element_parser_is_not_wrapped() {
        let error = convert("list<Money>", "1").unwrap_err();
        assert!(matches!(error, ConfigError::MissingParser { .. }));
    }

    proptest! {
        #[test]
        fn prop_i64_display_converts_back(n in any::<i64>()) {
            let value = Value::I64(n);
            prop_assert_eq!(convert("long", &value.to_string()).unwrap(), value);
        }

        #[test]
        fn prop_f64_display_converts_back(n in any::<f64>().prop_filter("finite", |n| n.is_finite())) {
            let value = Value::from(n);
            prop_assert_eq!(convert("f64", &value.to_string()).unwrap(), value);
        }

        #[test]
        fn prop_bool_display_converts_back(b in any::<bool>()) {
            let value = Value::Bool(b);
            prop_assert_eq!(convert("bool", &value.to_string()).unwrap(), value);
        }

        #[test]
        fn prop_u16_list_display_converts_back(items in prop::collection::vec(any::<u16>(), 1..20)) {
            let value = Value::from(items);
            prop_assert_eq!(convert("list<u16>", &value.to_string()).unwrap(), value);
        }
    }
}
