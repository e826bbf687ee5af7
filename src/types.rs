//! Type descriptors: what a raw string should be converted into
//!
//! A [`TypeDescriptor`] is built once from a declared schema (or from a Rust
//! type through [`Describe`]) and drives parser selection in the converter.
//! Descriptors also have a compact textual form used by the CLI:
//!
//! ```text
//! i32                      simple type
//! list<i32>                parameterized type
//! map<string,i64>          parameterized type with two arguments
//! [u8]                     array of u8
//! TimeUnit{DAYS|HOURS}     enum with its constants
//! ?  'T                    wildcard / type variable (always rejected)
//! ```

use crate::error::{ConfigError, Result};
use crate::models::temporal::{
    IsoDuration, MonthDay, OffsetTime, Period, Year, YearMonth, ZoneId, ZoneOffset, ZonedDateTime,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Canonical type names understood by the built-in parsers
pub mod names {
    pub const BOOL: &str = "bool";
    pub const CHAR: &str = "char";
    pub const I8: &str = "i8";
    pub const I16: &str = "i16";
    pub const I32: &str = "i32";
    pub const I64: &str = "i64";
    pub const I128: &str = "i128";
    pub const U8: &str = "u8";
    pub const U16: &str = "u16";
    pub const U32: &str = "u32";
    pub const U64: &str = "u64";
    pub const U128: &str = "u128";
    pub const F32: &str = "f32";
    pub const F64: &str = "f64";
    pub const BIG_INT: &str = "bigint";
    pub const BIG_DECIMAL: &str = "bigdecimal";
    pub const STRING: &str = "string";
    pub const URL: &str = "url";
    pub const URI: &str = "uri";

    pub const INSTANT: &str = "instant";
    pub const LOCAL_DATE_TIME: &str = "local_date_time";
    pub const LOCAL_DATE: &str = "local_date";
    pub const LOCAL_TIME: &str = "local_time";
    pub const OFFSET_DATE_TIME: &str = "offset_date_time";
    pub const OFFSET_TIME: &str = "offset_time";
    pub const ZONED_DATE_TIME: &str = "zoned_date_time";
    pub const ZONE_ID: &str = "zone_id";
    pub const ZONE_OFFSET: &str = "zone_offset";
    pub const DURATION: &str = "duration";
    pub const PERIOD: &str = "period";
    pub const YEAR: &str = "year";
    pub const YEAR_MONTH: &str = "year_month";
    pub const MONTH_DAY: &str = "month_day";

    pub const OPTION: &str = "option";
    pub const LIST: &str = "list";
    pub const SET: &str = "set";
    pub const MAP: &str = "map";

    /// Dispatch key of the array parser
    pub const ARRAY: &str = "array";
    /// Dispatch key of the generic enum parser
    pub const ENUM: &str = "enum";
}

/// Scalar name pairs that always resolve to the same parser: `(canonical, alias)`
pub const SCALAR_ALIASES: &[(&str, &str)] = &[
    (names::BOOL, "boolean"),
    (names::CHAR, "character"),
    (names::I8, "byte"),
    (names::I16, "short"),
    (names::I32, "integer"),
    (names::I64, "long"),
    (names::F32, "float"),
    (names::F64, "double"),
];

/// The other half of a scalar alias pair, if `name` belongs to one
pub fn linked_name(name: &str) -> Option<&'static str> {
    SCALAR_ALIASES.iter().find_map(|&(canonical, alias)| {
        if canonical == name {
            Some(alias)
        } else if alias == name {
            Some(canonical)
        } else {
            None
        }
    })
}

/// An enumerated type together with its declared constant names
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnumDescriptor {
    name: String,
    constants: Vec<String>,
}

impl EnumDescriptor {
    /// Create an enum descriptor
    pub fn new<N, I, S>(name: N, constants: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Enum type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared constant names in declaration order
    pub fn constants(&self) -> &[String] {
        &self.constants
    }

    /// Exact, case-sensitive constant lookup
    pub fn constant(&self, raw: &str) -> Option<&str> {
        self.constants.iter().find(|c| c.as_str() == raw).map(String::as_str)
    }
}

/// Shape of a value to produce from a raw string
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeDescriptor {
    /// Non-parameterized type, looked up by name
    Simple(String),
    /// Fixed-size array of a component type
    Array(Box<TypeDescriptor>),
    /// Enumerated type carrying its constants
    Enum(EnumDescriptor),
    /// Generic container with one or two type arguments
    Parameterized {
        raw: String,
        args: Vec<TypeDescriptor>,
    },
    /// Unbounded wildcard; never convertible
    Wildcard,
    /// Unresolved type variable; never convertible
    Variable(String),
}

impl TypeDescriptor {
    /// Simple named type
    pub fn simple<S: Into<String>>(name: S) -> Self {
        Self::Simple(name.into())
    }

    /// Array of `component`
    pub fn array(component: TypeDescriptor) -> Self {
        Self::Array(Box::new(component))
    }

    /// Enum with the given constants
    pub fn enumeration<N, I, S>(name: N, constants: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(EnumDescriptor::new(name, constants))
    }

    /// Parameterized type
    pub fn parameterized<S: Into<String>>(raw: S, args: Vec<TypeDescriptor>) -> Self {
        Self::Parameterized { raw: raw.into(), args }
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::parameterized(names::OPTION, vec![inner])
    }

    pub fn list(element: TypeDescriptor) -> Self {
        Self::parameterized(names::LIST, vec![element])
    }

    pub fn set(element: TypeDescriptor) -> Self {
        Self::parameterized(names::SET, vec![element])
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::parameterized(names::MAP, vec![key, value])
    }

    /// Descriptor of a Rust type
    pub fn of<T: Describe + ?Sized>() -> Self {
        T::descriptor()
    }

    /// Name of the unparameterized type this descriptor dispatches on
    pub fn raw_name(&self) -> &str {
        match self {
            Self::Simple(name) => name,
            Self::Array(_) => names::ARRAY,
            Self::Enum(e) => e.name(),
            Self::Parameterized { raw, .. } => raw,
            Self::Wildcard => "?",
            Self::Variable(name) => name,
        }
    }

    /// Type arguments of a parameterized descriptor
    pub fn args(&self) -> &[TypeDescriptor] {
        match self {
            Self::Parameterized { args, .. } => args,
            _ => &[],
        }
    }

    /// First wildcard or type variable anywhere inside this descriptor
    pub fn unresolved_part(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::Wildcard | Self::Variable(_) => Some(self),
            Self::Array(component) => component.unresolved_part(),
            Self::Parameterized { args, .. } => args.iter().find_map(TypeDescriptor::unresolved_part),
            Self::Simple(_) | Self::Enum(_) => None,
        }
    }

    /// Registry key for a parser producing exactly this descriptor
    ///
    /// Enums key by their name so a parser produced for a concrete enum
    /// overrides the generic enum parser for that type only.
    pub fn registry_key(&self) -> Result<String> {
        if let Some(part) = self.unresolved_part() {
            return Err(ConfigError::registration(format!(
                "produced type '{}' contains unresolved part '{}'",
                self, part
            )));
        }
        match self {
            Self::Simple(name) if !is_valid_name(name) => Err(ConfigError::registration(format!(
                "produced type has an invalid name '{}'",
                name
            ))),
            Self::Enum(e) if !is_valid_name(e.name()) => Err(ConfigError::registration(format!(
                "produced enum has an invalid name '{}'",
                e.name()
            ))),
            Self::Enum(e) => Ok(e.name().to_string()),
            Self::Parameterized { raw, args } if !is_valid_name(raw) || args.is_empty() => {
                Err(ConfigError::registration(format!("produced type '{}' is malformed", self)))
            }
            _ => Ok(self.to_string()),
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == ':')
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(name) => f.write_str(name),
            Self::Array(component) => write!(f, "[{}]", component),
            Self::Enum(e) => write!(f, "{}{{{}}}", e.name, e.constants.join("|")),
            Self::Parameterized { raw, args } => {
                write!(f, "{}<", raw)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")
            }
            Self::Wildcard => f.write_str("?"),
            Self::Variable(name) => write!(f, "'{}", name),
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = DescriptorParser { input: s, pos: 0, depth: 0 };
        let descriptor = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != s.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(descriptor)
    }
}

/// Deepest nesting of `[..]` and `<..>` the descriptor grammar accepts
pub const MAX_DESCRIPTOR_DEPTH: usize = 32;

/// Recursive-descent parser for the textual descriptor form
struct DescriptorParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> DescriptorParser<'a> {
    fn error(&self, message: &str) -> ConfigError {
        ConfigError::unsupported(format!(
            "malformed type descriptor '{}' at offset {}: {}",
            self.input, self.pos, message
        ))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", expected)))
        }
    }

    fn identifier(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' || c == ':' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(self.error("expected a type name"));
        }
        Ok(&self.input[start..self.pos])
    }

    fn parse_type(&mut self) -> Result<TypeDescriptor> {
        if self.depth >= MAX_DESCRIPTOR_DEPTH {
            return Err(self.error(&format!("nesting deeper than {} levels", MAX_DESCRIPTOR_DEPTH)));
        }
        self.depth += 1;
        let descriptor = self.parse_nested();
        self.depth -= 1;
        descriptor
    }

    fn parse_nested(&mut self) -> Result<TypeDescriptor> {
        if self.eat('?') {
            return Ok(TypeDescriptor::Wildcard);
        }
        if self.eat('\'') {
            return Ok(TypeDescriptor::Variable(self.identifier()?.to_string()));
        }
        if self.eat('[') {
            let component = self.parse_type()?;
            self.expect(']')?;
            return Ok(TypeDescriptor::array(component));
        }

        let name = self.identifier()?;
        if self.eat('{') {
            let mut constants = vec![self.identifier()?.to_string()];
            while self.eat('|') {
                constants.push(self.identifier()?.to_string());
            }
            self.expect('}')?;
            return Ok(TypeDescriptor::enumeration(name, constants));
        }
        if self.eat('<') {
            let mut args = vec![self.parse_type()?];
            while self.eat(',') {
                args.push(self.parse_type()?);
            }
            self.expect('>')?;
            return Ok(TypeDescriptor::parameterized(name, args));
        }
        Ok(TypeDescriptor::simple(name))
    }
}

/// Rust types with a static type descriptor
///
/// This is how the produced type of a custom parser is determined and how
/// `env_config!` derives field descriptors from field types.
pub trait Describe {
    fn descriptor() -> TypeDescriptor;
}

macro_rules! describe_simple {
    ($($ty:ty => $name:expr),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::simple($name)
                }
            }
        )*
    };
}

describe_simple! {
    bool => names::BOOL,
    char => names::CHAR,
    i8 => names::I8,
    i16 => names::I16,
    i32 => names::I32,
    i64 => names::I64,
    i128 => names::I128,
    u8 => names::U8,
    u16 => names::U16,
    u32 => names::U32,
    u64 => names::U64,
    u128 => names::U128,
    f32 => names::F32,
    f64 => names::F64,
    num_bigint::BigInt => names::BIG_INT,
    bigdecimal::BigDecimal => names::BIG_DECIMAL,
    String => names::STRING,
    url::Url => names::URL,
    crate::models::Uri => names::URI,
    chrono::DateTime<chrono::Utc> => names::INSTANT,
    chrono::NaiveDateTime => names::LOCAL_DATE_TIME,
    chrono::NaiveDate => names::LOCAL_DATE,
    chrono::NaiveTime => names::LOCAL_TIME,
    chrono::DateTime<chrono::FixedOffset> => names::OFFSET_DATE_TIME,
    OffsetTime => names::OFFSET_TIME,
    ZonedDateTime => names::ZONED_DATE_TIME,
    ZoneId => names::ZONE_ID,
    chrono_tz::Tz => names::ZONE_ID,
    ZoneOffset => names::ZONE_OFFSET,
    chrono::FixedOffset => names::ZONE_OFFSET,
    IsoDuration => names::DURATION,
    std::time::Duration => names::DURATION,
    chrono::TimeDelta => names::DURATION,
    Period => names::PERIOD,
    Year => names::YEAR,
    YearMonth => names::YEAR_MONTH,
    MonthDay => names::MONTH_DAY,
}

impl<T: Describe> Describe for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::optional(T::descriptor())
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::list(T::descriptor())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::array(T::descriptor())
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::set(T::descriptor())
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::set(T::descriptor())
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map(K::descriptor(), V::descriptor())
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map(K::descriptor(), V::descriptor())
    }
}
