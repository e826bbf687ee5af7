//! Built-in parsers for ISO-8601 temporal types

use super::builtins::parser_fn;
use super::{ParserRegistry, ValueParser};
use crate::convert::Converter;
use crate::error::{ConfigError, Result, ValueErrorKind};
use crate::models::temporal::{self, IsoDuration, MonthDay, OffsetTime, Period, Year, YearMonth, ZoneId, ZoneOffset, ZonedDateTime};
use crate::models::Value;
use crate::types::{names, TypeDescriptor};
use std::sync::Arc;

/// Parser built from a text-to-value function; empty or bad text is a date-time-format error
fn temporal_parser<T, F>(target: &'static str, parse: F) -> impl ValueParser
where
    T: Into<Value> + 'static,
    F: Fn(&str) -> std::result::Result<T, String> + Send + Sync + 'static,
{
    parser_fn(move |raw: &str, _: &dyn Converter, _: &[TypeDescriptor]| -> Result<Value> {
        if raw.is_empty() {
            return Err(ConfigError::malformed(target, raw, ValueErrorKind::DateTimeFormat, "empty input"));
        }
        parse(raw)
            .map(Into::into)
            .map_err(|reason| ConfigError::malformed(target, raw, ValueErrorKind::DateTimeFormat, reason))
    })
}

fn add<P: ValueParser + 'static>(registry: &mut ParserRegistry, name: &str, parser: P) {
    registry.insert(name, Arc::new(parser));
}

pub(super) fn register_temporal_types(registry: &mut ParserRegistry) {
    add(registry, names::INSTANT, temporal_parser(names::INSTANT, temporal::parse_instant));
    add(registry, names::LOCAL_DATE_TIME, temporal_parser(names::LOCAL_DATE_TIME, temporal::parse_local_date_time));
    add(registry, names::LOCAL_DATE, temporal_parser(names::LOCAL_DATE, temporal::parse_local_date));
    add(registry, names::LOCAL_TIME, temporal_parser(names::LOCAL_TIME, temporal::parse_local_time));
    add(registry, names::OFFSET_DATE_TIME, temporal_parser(names::OFFSET_DATE_TIME, temporal::parse_offset_date_time));
    add(registry, names::OFFSET_TIME, temporal_parser(names::OFFSET_TIME, |s| s.parse::<OffsetTime>()));
    add(registry, names::ZONED_DATE_TIME, temporal_parser(names::ZONED_DATE_TIME, |s| s.parse::<ZonedDateTime>()));
    add(registry, names::ZONE_ID, temporal_parser(names::ZONE_ID, |s| s.parse::<ZoneId>()));
    add(registry, names::ZONE_OFFSET, temporal_parser(names::ZONE_OFFSET, |s| s.parse::<ZoneOffset>()));
    add(registry, names::DURATION, temporal_parser(names::DURATION, |s| s.parse::<IsoDuration>()));
    add(registry, names::PERIOD, temporal_parser(names::PERIOD, |s| s.parse::<Period>()));
    add(registry, names::YEAR, temporal_parser(names::YEAR, |s| s.parse::<Year>()));
    add(registry, names::YEAR_MONTH, temporal_parser(names::YEAR_MONTH, |s| s.parse::<YearMonth>()));
    add(registry, names::MONTH_DAY, temporal_parser(names::MONTH_DAY, |s| s.parse::<MonthDay>()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::TypeConverter;

    fn convert(name: &str, raw: &str) -> Result<Value> {
        let registry = ParserRegistry::new();
        TypeConverter::new(&registry).convert(&TypeDescriptor::simple(name), raw)
    }

    const SAMPLES: &[(&str, &str)] = &[
        (names::DURATION, "PT5H"),
        (names::PERIOD, "P5D"),
        (names::LOCAL_TIME, "23:10:28.059"),
        (names::LOCAL_DATE, "2021-08-30"),
        (names::LOCAL_DATE_TIME, "2021-08-30T23:37:18.790"),
        (names::INSTANT, "1970-01-01T00:00:00Z"),
        (names::OFFSET_DATE_TIME, "2021-08-30T23:38:57+08:00"),
        (names::ZONED_DATE_TIME, "2021-08-30T23:38:40.436576+08:00[Australia/Perth]"),
        (names::OFFSET_TIME, "23:39:11.899767+08:00"),
        (names::ZONE_ID, "Australia/Perth"),
        (names::ZONE_OFFSET, "+08:00"),
        (names::MONTH_DAY, "--02-29"),
        (names::YEAR, "2021"),
        (names::YEAR_MONTH, "2021-08"),
    ];

    #[test]
    fn test_samples_convert_and_print_back() {
        for (name, raw) in SAMPLES {
            let value = convert(name, raw).unwrap_or_else(|e| panic!("{} {}: {}", name, raw, e));
            assert_eq!(value.kind_name(), *name);
            assert_eq!(value.to_string(), *raw, "canonical form of {}", name);
            assert_eq!(convert(name, &value.to_string()).unwrap(), value);
        }
    }

    #[test]
    fn test_empty_input_fails_for_every_temporal_type() {
        for (name, _) in SAMPLES {
            let error = convert(name, "").unwrap_err();
            assert_eq!(error.value_kind(), Some(ValueErrorKind::DateTimeFormat), "{}", name);
        }
    }

    #[test]
    fn test_malformed_input() {
        for (name, raw) in [
            (names::DURATION, "5 hours"),
            (names::LOCAL_DATE, "30/08/2021"),
            (names::INSTANT, "2021-08-30T10:00:00"),
            (names::ZONE_ID, "Nowhere/Special"),
            (names::MONTH_DAY, "--13-01"),
        ] {
            let error = convert(name, raw).unwrap_err();
            assert_eq!(error.value_kind(), Some(ValueErrorKind::DateTimeFormat), "{} {}", name, raw);
        }
    }

    #[test]
    fn test_duration_components() {
        assert_eq!(
            convert(names::DURATION, "P2DT3H4M").unwrap(),
            Value::Duration(IsoDuration::from_secs(2 * 86_400 + 3 * 3_600 + 4 * 60))
        );
        assert_eq!(convert(names::DURATION, "PT20.345S").unwrap().to_string(), "PT20.345S");
    }
}
