//! Converted configuration values

use super::temporal::{
    format_instant, format_local_date, format_local_date_time, format_local_time, format_offset_date_time,
    IsoDuration, MonthDay, OffsetTime, Period, Year, YearMonth, ZoneId, ZoneOffset, ZonedDateTime,
};
use crate::types::{names, TypeDescriptor};
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use num_bigint::BigInt;
use ordered_float::OrderedFloat;
use super::uri::Uri;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use url::Url;

/// A constant of a declared enum type
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnumConstant {
    enum_name: String,
    name: String,
}

impl EnumConstant {
    pub fn new<E: Into<String>, N: Into<String>>(enum_name: E, name: N) -> Self {
        Self {
            enum_name: enum_name.into(),
            name: name.into(),
        }
    }

    pub fn enum_name(&self) -> &str {
        &self.enum_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

macro_rules! float_value {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            /// Float with the total order of `OrderedFloat`, except that `-0.0`
            /// and `0.0` are distinct, so both survive in a set
            #[derive(Debug, Clone, Copy)]
            pub struct $name(OrderedFloat<$ty>);

            impl $name {
                pub fn into_inner(self) -> $ty {
                    self.0.into_inner()
                }
            }

            impl From<$ty> for $name {
                fn from(v: $ty) -> Self {
                    Self(OrderedFloat(v))
                }
            }

            impl Ord for $name {
                fn cmp(&self, other: &Self) -> Ordering {
                    self.0.cmp(&other.0).then_with(|| {
                        if self.0.into_inner().is_nan() {
                            Ordering::Equal
                        } else {
                            other.0.into_inner().is_sign_negative().cmp(&self.0.into_inner().is_sign_negative())
                        }
                    })
                }
            }

            impl PartialOrd for $name {
                fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                    Some(self.cmp(other))
                }
            }

            impl PartialEq for $name {
                fn eq(&self, other: &Self) -> bool {
                    self.cmp(other) == Ordering::Equal
                }
            }

            impl Eq for $name {}

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0.into_inner())
                }
            }
        )*
    };
}

float_value! {
    F32Value => f32,
    F64Value => f64,
}

/// A value produced by the converter
///
/// Values are totally ordered so they can be set elements and map keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    F32(F32Value),
    F64(F64Value),
    BigInt(BigInt),
    Decimal(BigDecimal),
    String(String),
    Url(Url),
    Uri(Uri),
    Instant(DateTime<Utc>),
    LocalDateTime(NaiveDateTime),
    LocalDate(NaiveDate),
    LocalTime(NaiveTime),
    OffsetDateTime(DateTime<FixedOffset>),
    OffsetTime(OffsetTime),
    ZonedDateTime(ZonedDateTime),
    ZoneId(ZoneId),
    ZoneOffset(ZoneOffset),
    Duration(IsoDuration),
    Period(Period),
    Year(Year),
    YearMonth(YearMonth),
    MonthDay(MonthDay),
    Enum(EnumConstant),
    Optional(Option<Box<Value>>),
    List(Vec<Value>),
    Set(BTreeSet<Value>),
    Array {
        component: TypeDescriptor,
        items: Vec<Value>,
    },
    Map(BTreeMap<Value, Value>),
}

impl Value {
    /// Short name of the value's kind, used in type-mismatch reports
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => names::BOOL,
            Value::Char(_) => names::CHAR,
            Value::I8(_) => names::I8,
            Value::I16(_) => names::I16,
            Value::I32(_) => names::I32,
            Value::I64(_) => names::I64,
            Value::I128(_) => names::I128,
            Value::U8(_) => names::U8,
            Value::U16(_) => names::U16,
            Value::U32(_) => names::U32,
            Value::U64(_) => names::U64,
            Value::U128(_) => names::U128,
            Value::F32(_) => names::F32,
            Value::F64(_) => names::F64,
            Value::BigInt(_) => names::BIG_INT,
            Value::Decimal(_) => names::BIG_DECIMAL,
            Value::String(_) => names::STRING,
            Value::Url(_) => names::URL,
            Value::Uri(_) => names::URI,
            Value::Instant(_) => names::INSTANT,
            Value::LocalDateTime(_) => names::LOCAL_DATE_TIME,
            Value::LocalDate(_) => names::LOCAL_DATE,
            Value::LocalTime(_) => names::LOCAL_TIME,
            Value::OffsetDateTime(_) => names::OFFSET_DATE_TIME,
            Value::OffsetTime(_) => names::OFFSET_TIME,
            Value::ZonedDateTime(_) => names::ZONED_DATE_TIME,
            Value::ZoneId(_) => names::ZONE_ID,
            Value::ZoneOffset(_) => names::ZONE_OFFSET,
            Value::Duration(_) => names::DURATION,
            Value::Period(_) => names::PERIOD,
            Value::Year(_) => names::YEAR,
            Value::YearMonth(_) => names::YEAR_MONTH,
            Value::MonthDay(_) => names::MONTH_DAY,
            Value::Enum(_) => names::ENUM,
            Value::Optional(_) => names::OPTION,
            Value::List(_) => names::LIST,
            Value::Set(_) => names::SET,
            Value::Array { .. } => names::ARRAY,
            Value::Map(_) => names::MAP,
        }
    }

    /// Extract a typed Rust value
    pub fn extract<T: FromValue>(&self) -> Option<T> {
        T::from_value(self)
    }

    /// JSON rendering for reports
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Bool(b) => Json::Bool(*b),
            Value::I8(n) => Json::from(*n),
            Value::I16(n) => Json::from(*n),
            Value::I32(n) => Json::from(*n),
            Value::I64(n) => Json::from(*n),
            Value::U8(n) => Json::from(*n),
            Value::U16(n) => Json::from(*n),
            Value::U32(n) => Json::from(*n),
            Value::U64(n) => Json::from(*n),
            Value::I128(n) => i64::try_from(*n).map(Json::from).unwrap_or_else(|_| Json::String(n.to_string())),
            Value::U128(n) => u64::try_from(*n).map(Json::from).unwrap_or_else(|_| Json::String(n.to_string())),
            Value::F32(n) => serde_json::Number::from_f64(f64::from(n.into_inner()))
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::F64(n) => serde_json::Number::from_f64(n.into_inner())
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Optional(None) => Json::Null,
            Value::Optional(Some(inner)) => inner.to_json(),
            Value::List(items) | Value::Array { items, .. } => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Set(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.to_json()))
                    .collect(),
            ),
            other => Json::String(other.to_string()),
        }
    }
}

fn write_joined<'a, I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = &'a Value>,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Prints the textual form the value was (or could have been) parsed from
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::I128(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::U128(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::BigInt(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::Url(v) => f.write_str(v.as_str()),
            Value::Uri(v) => f.write_str(v.as_str()),
            Value::Instant(v) => f.write_str(&format_instant(v)),
            Value::LocalDateTime(v) => f.write_str(&format_local_date_time(v)),
            Value::LocalDate(v) => f.write_str(&format_local_date(v)),
            Value::LocalTime(v) => f.write_str(&format_local_time(v)),
            Value::OffsetDateTime(v) => f.write_str(&format_offset_date_time(v)),
            Value::OffsetTime(v) => write!(f, "{}", v),
            Value::ZonedDateTime(v) => write!(f, "{}", v),
            Value::ZoneId(v) => write!(f, "{}", v),
            Value::ZoneOffset(v) => write!(f, "{}", v),
            Value::Duration(v) => write!(f, "{}", v),
            Value::Period(v) => write!(f, "{}", v),
            Value::Year(v) => write!(f, "{}", v),
            Value::YearMonth(v) => write!(f, "{}", v),
            Value::MonthDay(v) => write!(f, "{}", v),
            Value::Enum(v) => f.write_str(v.name()),
            Value::Optional(None) => Ok(()),
            Value::Optional(Some(v)) => write!(f, "{}", v),
            Value::List(items) | Value::Array { items, .. } => write_joined(f, items),
            Value::Set(items) => write_joined(f, items),
            Value::Map(entries) => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                Ok(())
            }
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    f32 => F32,
    f64 => F64,
    BigInt => BigInt,
    BigDecimal => Decimal,
    String => String,
    Url => Url,
    Uri => Uri,
    DateTime<Utc> => Instant,
    NaiveDateTime => LocalDateTime,
    NaiveDate => LocalDate,
    NaiveTime => LocalTime,
    DateTime<FixedOffset> => OffsetDateTime,
    OffsetTime => OffsetTime,
    ZonedDateTime => ZonedDateTime,
    ZoneId => ZoneId,
    ZoneOffset => ZoneOffset,
    IsoDuration => Duration,
    Period => Period,
    Year => Year,
    YearMonth => YearMonth,
    MonthDay => MonthDay,
    EnumConstant => Enum,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Value::Optional(v.map(|inner| Box::new(inner.into())))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// Rust types that can be read back out of a [`Value`]
///
/// Extraction is strict: an `i32` field is only readable as `i32`.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! from_value_copy {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_value_copy! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    BigInt => BigInt,
    BigDecimal => Decimal,
    String => String,
    Url => Url,
    Uri => Uri,
    DateTime<Utc> => Instant,
    NaiveDateTime => LocalDateTime,
    NaiveDate => LocalDate,
    NaiveTime => LocalTime,
    DateTime<FixedOffset> => OffsetDateTime,
    OffsetTime => OffsetTime,
    ZonedDateTime => ZonedDateTime,
    ZoneId => ZoneId,
    ZoneOffset => ZoneOffset,
    IsoDuration => Duration,
    Period => Period,
    Year => Year,
    YearMonth => YearMonth,
    MonthDay => MonthDay,
    EnumConstant => Enum,
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::F32(v) => Some(v.into_inner()),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::F64(v) => Some(v.into_inner()),
            _ => None,
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for std::time::Duration {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Duration(d) => d.to_std(),
            _ => None,
        }
    }
}

impl FromValue for TimeDelta {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Duration(d) => d.to_time_delta(),
            _ => None,
        }
    }
}

impl FromValue for FixedOffset {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::ZoneOffset(offset) => offset.to_fixed(),
            _ => None,
        }
    }
}

impl FromValue for Tz {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::ZoneId(ZoneId::Region(region)) => Some(region.tz()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Optional(None) => Some(None),
            Value::Optional(Some(inner)) => T::from_value(inner).map(Some),
            _ => None,
        }
    }
}

fn sequence<T: FromValue>(value: &Value) -> Option<Vec<T>> {
    match value {
        Value::List(items) | Value::Array { items, .. } => items.iter().map(T::from_value).collect(),
        _ => None,
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        sequence(value)
    }
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    fn from_value(value: &Value) -> Option<Self> {
        sequence(value)?.try_into().ok()
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Set(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T, S> FromValue for HashSet<T, S>
where
    T: FromValue + Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Set(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Map(entries) => entries
                .iter()
                .map(|(k, v)| Some((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            _ => None,
        }
    }
}

impl<K, V, S> FromValue for HashMap<K, V, S>
where
    K: FromValue + Eq + Hash,
    V: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Map(entries) => entries
                .iter()
                .map(|(k, v)| Some((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_delimited_forms() {
        let list = Value::List(vec![Value::I32(1), Value::I32(2), Value::I32(3)]);
        assert_eq!(list.to_string(), "1,2,3");

        let mut entries = BTreeMap::new();
        entries.insert(Value::from("a"), Value::I64(1));
        entries.insert(Value::from("b"), Value::I64(2));
        assert_eq!(Value::Map(entries).to_string(), "a:1,b:2");

        assert_eq!(Value::Optional(None).to_string(), "");
        assert_eq!(Value::from(Some(5u8)).to_string(), "5");
        assert_eq!(Value::Duration(IsoDuration::from_secs(18_000)).to_string(), "PT5H");
    }

    #[test]
    fn test_strict_extraction() {
        let value = Value::I32(42);
        assert_eq!(value.extract::<i32>(), Some(42));
        assert_eq!(value.extract::<i64>(), None);
        assert_eq!(value.extract::<String>(), None);
    }

    #[test]
    fn test_container_extraction() {
        let set = Value::Set([Value::from("a"), Value::from("b")].into_iter().collect());
        let names: BTreeSet<String> = set.extract().unwrap();
        assert_eq!(names.len(), 2);
        let hashed: HashSet<String> = set.extract().unwrap();
        assert!(hashed.contains("a"));

        let array = Value::Array {
            component: TypeDescriptor::simple("u8"),
            items: vec![Value::U8(1), Value::U8(2)],
        };
        assert_eq!(array.extract::<[u8; 2]>(), Some([1, 2]));
        assert_eq!(array.extract::<[u8; 3]>(), None);
        assert_eq!(array.extract::<Vec<u8>>(), Some(vec![1, 2]));

        let nothing = Value::Optional(None);
        assert_eq!(nothing.extract::<Option<i32>>(), Some(None));
        assert_eq!(nothing.extract::<i32>(), None);
    }

    #[test]
    fn test_duration_extraction() {
        let value = Value::Duration(IsoDuration::from_millis(1_500));
        assert_eq!(value.extract::<std::time::Duration>(), Some(std::time::Duration::from_millis(1_500)));
        let negative = Value::Duration(IsoDuration::from_secs(-5));
        assert_eq!(negative.extract::<std::time::Duration>(), None);
        assert!(negative.extract::<TimeDelta>().is_some());
    }

    #[test]
    fn test_json_rendering() {
        assert_eq!(Value::I32(7).to_json(), serde_json::json!(7));
        assert_eq!(Value::Optional(None).to_json(), serde_json::Value::Null);
        assert_eq!(Value::U128(u128::MAX).to_json(), serde_json::json!(u128::MAX.to_string()));
        assert_eq!(
            Value::List(vec![Value::Bool(true), Value::from("x")]).to_json(),
            serde_json::json!([true, "x"])
        );
        assert_eq!(
            Value::Enum(EnumConstant::new("TimeUnit", "DAYS")).to_json(),
            serde_json::json!("DAYS")
        );
    }

    #[test]
    fn test_values_are_ordered() {
        let set: BTreeSet<Value> = [Value::from(2.5f64), Value::from(1.5f64)]
            .into_iter()
            .collect();
        assert_eq!(set.iter().next(), Some(&Value::from(1.5f64)));
    }

    #[test]
    fn test_signed_zeros_are_distinct() {
        assert_ne!(Value::from(0.0f64), Value::from(-0.0f64));
        assert!(Value::from(-0.0f64) < Value::from(0.0f64));
        assert!(Value::from(-1.0f32) < Value::from(-0.0f32));
        assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));

        let set: BTreeSet<Value> = [0.0f64, -0.0, 0.0].into_iter().map(Value::from).collect();
        assert_eq!(set.len(), 2);
        assert_eq!(Value::Set(set).to_string(), "-0,0");
    }
}
