//! ISO-8601 temporal value types without a direct chrono counterpart
//!
//! Every type here parses the textual forms accepted by the configuration
//! parsers and prints a canonical form that parses back to an equal value.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, SecondsFormat,
    TimeDelta, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;
const MAX_OFFSET_SECONDS: i32 = 18 * 3_600;

static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^([-+]?)P(?:([-+]?[0-9]+)D)?(T(?:([-+]?[0-9]+)H)?(?:([-+]?[0-9]+)M)?(?:([-+]?[0-9]+)(?:[.,]([0-9]{0,9}))?S)?)?$",
    )
    .expect("duration pattern is valid")
});

static PERIOD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([-+]?)P(?:([-+]?[0-9]+)Y)?(?:([-+]?[0-9]+)M)?(?:([-+]?[0-9]+)W)?(?:([-+]?[0-9]+)D)?$")
        .expect("period pattern is valid")
});

/// Signed duration with nanosecond precision (`PT8H6M12.345S`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IsoDuration {
    seconds: i64,
    nanos: u32,
}

impl IsoDuration {
    pub const ZERO: IsoDuration = IsoDuration { seconds: 0, nanos: 0 };

    /// Create a duration, normalising `nanos` into `0..1_000_000_000`
    pub fn new(seconds: i64, nanos: i64) -> Option<Self> {
        let carry = nanos.div_euclid(NANOS_PER_SECOND);
        let nanos = nanos.rem_euclid(NANOS_PER_SECOND) as u32;
        Some(Self { seconds: seconds.checked_add(carry)?, nanos })
    }

    pub fn from_secs(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    pub fn from_millis(millis: i64) -> Self {
        Self {
            seconds: millis.div_euclid(1_000),
            nanos: (millis.rem_euclid(1_000) * 1_000_000) as u32,
        }
    }

    /// Whole seconds, rounded towards negative infinity
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanosecond adjustment, always non-negative
    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0 && self.nanos == 0
    }

    fn negated(&self) -> Option<Self> {
        if self.nanos == 0 {
            Some(Self { seconds: self.seconds.checked_neg()?, nanos: 0 })
        } else {
            Some(Self {
                seconds: self.seconds.checked_neg()?.checked_sub(1)?,
                nanos: NANOS_PER_SECOND as u32 - self.nanos,
            })
        }
    }

    /// Standard-library duration, `None` for negative values
    pub fn to_std(&self) -> Option<std::time::Duration> {
        u64::try_from(self.seconds)
            .ok()
            .map(|secs| std::time::Duration::new(secs, self.nanos))
    }

    pub fn to_time_delta(&self) -> Option<TimeDelta> {
        TimeDelta::new(self.seconds, self.nanos)
    }
}

fn signed_group<'a>(caps: &Captures<'a>, index: usize) -> Option<&'a str> {
    caps.get(index).map(|m| m.as_str())
}

fn parse_number(text: &str) -> Result<i64, String> {
    text.parse::<i64>().map_err(|e| format!("numeric field '{}' {}", text, e))
}

fn scaled(value: i64, factor: i64) -> Result<i64, String> {
    value.checked_mul(factor).ok_or_else(|| "numeric overflow".to_string())
}

impl FromStr for IsoDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = DURATION_PATTERN
            .captures(s)
            .ok_or_else(|| "text is not an ISO-8601 duration".to_string())?;

        let days = signed_group(&caps, 2);
        let time_section = signed_group(&caps, 3);
        let hours = signed_group(&caps, 4);
        let minutes = signed_group(&caps, 5);
        let seconds = signed_group(&caps, 6);
        let fraction = signed_group(&caps, 7);

        if days.is_none() && hours.is_none() && minutes.is_none() && seconds.is_none() {
            return Err("duration has no components".to_string());
        }
        if time_section == Some("T") || time_section == Some("t") {
            return Err("time designator without a time component".to_string());
        }

        let mut total: i64 = 0;
        for (part, factor) in [
            (days, SECONDS_PER_DAY),
            (hours, SECONDS_PER_HOUR),
            (minutes, SECONDS_PER_MINUTE),
            (seconds, 1),
        ] {
            if let Some(text) = part {
                total = total
                    .checked_add(scaled(parse_number(text)?, factor)?)
                    .ok_or_else(|| "numeric overflow".to_string())?;
            }
        }

        let mut nanos: i64 = 0;
        if let Some(digits) = fraction.filter(|d| !d.is_empty()) {
            let padded = format!("{:0<9}", digits);
            nanos = parse_number(&padded)?;
            if seconds.is_some_and(|s| s.starts_with('-')) {
                nanos = -nanos;
            }
        }

        let duration = IsoDuration::new(total, nanos).ok_or_else(|| "numeric overflow".to_string())?;
        if caps.get(1).is_some_and(|m| m.as_str() == "-") {
            duration.negated().ok_or_else(|| "numeric overflow".to_string())
        } else {
            Ok(duration)
        }
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        let mut effective = self.seconds;
        if self.seconds < 0 && self.nanos > 0 {
            effective += 1;
        }
        let hours = effective / SECONDS_PER_HOUR;
        let minutes = (effective % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
        let secs = effective % SECONDS_PER_MINUTE;

        let mut out = String::from("PT");
        if hours != 0 {
            out.push_str(&format!("{}H", hours));
        }
        if minutes != 0 {
            out.push_str(&format!("{}M", minutes));
        }
        if secs == 0 && self.nanos == 0 && out.len() > 2 {
            return f.write_str(&out);
        }
        if self.seconds < 0 && self.nanos > 0 && secs == 0 {
            out.push_str("-0");
        } else {
            out.push_str(&secs.to_string());
        }
        if self.nanos > 0 {
            let nanos = i64::from(self.nanos);
            let shifted = if self.seconds < 0 { 2 * NANOS_PER_SECOND - nanos } else { nanos + NANOS_PER_SECOND };
            let digits = shifted.to_string();
            out.push('.');
            out.push_str(digits[1..].trim_end_matches('0'));
        }
        out.push('S');
        f.write_str(&out)
    }
}

/// Date-based amount of time (`P1Y2M3D`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Period {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl Period {
    pub fn new(years: i32, months: i32, days: i32) -> Self {
        Self { years, months, days }
    }

    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = PERIOD_PATTERN
            .captures(s)
            .ok_or_else(|| "text is not an ISO-8601 period".to_string())?;
        let component = |index: usize| -> Result<i32, String> {
            match caps.get(index) {
                Some(m) => m
                    .as_str()
                    .parse::<i32>()
                    .map_err(|e| format!("numeric field '{}' {}", m.as_str(), e)),
                None => Ok(0),
            }
        };
        if (2..=5).all(|i| caps.get(i).is_none()) {
            return Err("period has no components".to_string());
        }

        let overflow = || "numeric overflow".to_string();
        let days = component(5)?;
        let days = component(4)?
            .checked_mul(7)
            .and_then(|weeks| weeks.checked_add(days))
            .ok_or_else(overflow)?;
        let mut period = Period::new(component(2)?, component(3)?, days);

        if caps.get(1).is_some_and(|m| m.as_str() == "-") {
            period = Period::new(
                period.years.checked_neg().ok_or_else(overflow)?,
                period.months.checked_neg().ok_or_else(overflow)?,
                period.days.checked_neg().ok_or_else(overflow)?,
            );
        }
        Ok(period)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("P0D");
        }
        f.write_str("P")?;
        if self.years != 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        Ok(())
    }
}

/// Proleptic year; values outside `0000..=9999` carry an explicit sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(pub i32);

impl Year {
    pub fn value(&self) -> i32 {
        self.0
    }
}

fn parse_year(text: &str) -> Result<i32, String> {
    let (sign, digits) = match text.as_bytes().first() {
        Some(b'+') | Some(b'-') => (Some(&text[..1]), &text[1..]),
        _ => (None, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not a year", text));
    }
    match sign {
        None if digits.len() != 4 => Err("years outside 0000-9999 must be prefixed by a sign".to_string()),
        Some("+") if digits.len() <= 4 => Err("a positive sign is only allowed for years above 9999".to_string()),
        _ if digits.len() > 10 => Err("year out of range".to_string()),
        Some(_) if digits.len() < 4 => Err(format!("'{}' is not a year", text)),
        _ => text.parse::<i32>().map_err(|_| "year out of range".to_string()),
    }
}

impl FromStr for Year {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_year(s).map(Year)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 9999 {
            write!(f, "+{}", self.0)
        } else if self.0 < 0 {
            write!(f, "-{:04}", self.0.unsigned_abs())
        } else {
            write!(f, "{:04}", self.0)
        }
    }
}

/// Year and month (`2021-08`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }
}

fn two_digits(text: &str, what: &str) -> Result<u32, String> {
    if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{} must be two digits, got '{}'", what, text));
    }
    text.parse::<u32>().map_err(|e| e.to_string())
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .rsplit_once('-')
            .filter(|(year, _)| !year.is_empty() && *year != "-" && *year != "+")
            .ok_or_else(|| format!("'{}' is not a year-month", s))?;
        let year = parse_year(year)?;
        let month = two_digits(month, "month")?;
        YearMonth::new(year, month).ok_or_else(|| format!("invalid month {}", month))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", Year(self.year), self.month)
    }
}

/// Month and day of month, leap day included (`--02-29`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Option<Self> {
        let max_day = match month {
            2 => 29,
            4 | 6 | 9 | 11 => 30,
            1..=12 => 31,
            _ => return None,
        };
        (1..=max_day).contains(&day).then_some(Self { month, day })
    }
}

impl FromStr for MonthDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, day) = s
            .strip_prefix("--")
            .and_then(|rest| rest.split_once('-'))
            .ok_or_else(|| format!("'{}' is not a month-day", s))?;
        let month = two_digits(month, "month")?;
        let day = two_digits(day, "day")?;
        MonthDay::new(month, day).ok_or_else(|| format!("invalid month-day {:02}-{:02}", month, day))
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{:02}-{:02}", self.month, self.day)
    }
}

/// Fixed offset from UTC (`+08:00`, `Z`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneOffset(i32);

impl ZoneOffset {
    pub const UTC: ZoneOffset = ZoneOffset(0);

    pub fn from_seconds(total_seconds: i32) -> Option<Self> {
        (-MAX_OFFSET_SECONDS..=MAX_OFFSET_SECONDS)
            .contains(&total_seconds)
            .then_some(Self(total_seconds))
    }

    pub fn total_seconds(&self) -> i32 {
        self.0
    }

    pub fn to_fixed(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.0)
    }
}

impl From<FixedOffset> for ZoneOffset {
    fn from(offset: FixedOffset) -> Self {
        Self(offset.local_minus_utc())
    }
}

impl FromStr for ZoneOffset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "Z" || s == "z" {
            return Ok(Self::UTC);
        }
        let negative = match s.as_bytes().first() {
            Some(b'+') => false,
            Some(b'-') => true,
            _ => return Err(format!("offset '{}' must start with '+', '-' or be 'Z'", s)),
        };
        let body = &s[1..];
        let field = |range: std::ops::Range<usize>| -> Result<i32, String> {
            body.get(range)
                .filter(|t| t.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|t| t.parse::<i32>().ok())
                .ok_or_else(|| format!("invalid offset '{}'", s))
        };
        let separator = |index: usize| -> Result<(), String> {
            match body.as_bytes().get(index) {
                Some(b':') => Ok(()),
                _ => Err(format!("invalid offset '{}'", s)),
            }
        };
        let (hours, minutes, seconds) = match body.len() {
            1 => (field(0..1)?, 0, 0),
            2 => (field(0..2)?, 0, 0),
            4 => (field(0..2)?, field(2..4)?, 0),
            5 => {
                separator(2)?;
                (field(0..2)?, field(3..5)?, 0)
            }
            6 => (field(0..2)?, field(2..4)?, field(4..6)?),
            8 => {
                separator(2)?;
                separator(5)?;
                (field(0..2)?, field(3..5)?, field(6..8)?)
            }
            _ => return Err(format!("invalid offset '{}'", s)),
        };
        if hours > 18 || minutes > 59 || seconds > 59 {
            return Err(format!("offset '{}' is out of range", s));
        }
        let total = hours * 3_600 + minutes * 60 + seconds;
        ZoneOffset::from_seconds(if negative { -total } else { total })
            .ok_or_else(|| format!("offset '{}' is out of range", s))
    }
}

impl fmt::Display for ZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("Z");
        }
        let sign = if self.0 < 0 { '-' } else { '+' };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{:02}:{:02}", sign, abs / 3_600, (abs / 60) % 60)?;
        if abs % 60 != 0 {
            write!(f, ":{:02}", abs % 60)?;
        }
        Ok(())
    }
}

/// IANA time-zone region, ordered by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region(Tz);

impl Region {
    pub fn tz(&self) -> Tz {
        self.0
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl PartialOrd for Region {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Region {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

/// Time-zone identifier: a region (`Australia/Perth`) or a fixed offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZoneId {
    Offset(ZoneOffset),
    Region(Region),
}

impl ZoneId {
    pub fn region(tz: Tz) -> Self {
        Self::Region(Region(tz))
    }

    /// Offset in effect at the given UTC instant
    pub fn offset_at(&self, utc: &NaiveDateTime) -> FixedOffset {
        match self {
            Self::Offset(offset) => offset.to_fixed().unwrap_or_else(|| Utc.fix()),
            Self::Region(region) => region.tz().offset_from_utc_datetime(utc).fix(),
        }
    }
}

impl FromStr for ZoneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty zone id".to_string());
        }
        if s == "Z" || s.starts_with('+') || s.starts_with('-') {
            return s.parse::<ZoneOffset>().map(ZoneId::Offset);
        }
        s.parse::<Tz>()
            .map(ZoneId::region)
            .map_err(|e| format!("unknown time-zone region '{}': {}", s, e))
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(offset) => write!(f, "{}", offset),
            Self::Region(region) => f.write_str(region.name()),
        }
    }
}

/// Time of day with an offset (`23:39:11.899767+08:00`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OffsetTime {
    pub time: NaiveTime,
    pub offset: ZoneOffset,
}

impl FromStr for OffsetTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (time, offset) = split_offset(s).ok_or_else(|| format!("'{}' has no offset", s))?;
        Ok(Self {
            time: parse_local_time(time)?,
            offset: offset.parse()?,
        })
    }
}

impl fmt::Display for OffsetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_local_time(&self.time), self.offset)
    }
}

/// Date-time with an offset and the zone it was resolved in
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZonedDateTime {
    pub date_time: DateTime<FixedOffset>,
    pub zone: ZoneId,
}

impl FromStr for ZonedDateTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date_time, zone) = match s.strip_suffix(']').and_then(|head| head.split_once('[')) {
            Some((date_time, zone)) => (date_time, Some(zone.parse::<ZoneId>()?)),
            None => (s, None),
        };
        let parsed = parse_offset_date_time(date_time)?;
        match zone {
            Some(zone) => {
                let offset = zone.offset_at(&parsed.naive_utc());
                Ok(Self { date_time: parsed.with_timezone(&offset), zone })
            }
            None => Ok(Self {
                zone: ZoneId::Offset(ZoneOffset::from(*parsed.offset())),
                date_time: parsed,
            }),
        }
    }
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_offset_date_time(&self.date_time))?;
        if let ZoneId::Region(region) = self.zone {
            write!(f, "[{}]", region.name())?;
        }
        Ok(())
    }
}

/// Parse `HH:MM[:SS[.fraction]]`
pub fn parse_local_time(text: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map_err(|e| format!("'{}' is not a local time: {}", text, e))
}

/// Parse `YYYY-MM-DD`
pub fn parse_local_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| format!("'{}' is not a local date: {}", text, e))
}

/// Parse `YYYY-MM-DDTHH:MM[:SS[.fraction]]`
pub fn parse_local_date_time(text: &str) -> Result<NaiveDateTime, String> {
    let (date, time) = text
        .split_once(['T', 't'])
        .ok_or_else(|| format!("'{}' is missing the 'T' separator", text))?;
    Ok(NaiveDateTime::new(parse_local_date(date)?, parse_local_time(time)?))
}

/// Parse a local date-time followed by an offset
pub fn parse_offset_date_time(text: &str) -> Result<DateTime<FixedOffset>, String> {
    let (local, offset) = split_offset(text).ok_or_else(|| format!("'{}' has no offset", text))?;
    let local = parse_local_date_time(local)?;
    let offset = offset
        .parse::<ZoneOffset>()?
        .to_fixed()
        .ok_or_else(|| format!("offset in '{}' is out of range", text))?;
    offset
        .from_local_datetime(&local)
        .single()
        .ok_or_else(|| format!("'{}' is not a valid date-time", text))
}

/// Parse an instant; any offset is accepted and normalised to UTC
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>, String> {
    parse_offset_date_time(text).map(|dt| dt.with_timezone(&Utc))
}

/// Split trailing `Z`/`+hh:mm`/`-hh:mm` from the time part of `text`
fn split_offset(text: &str) -> Option<(&str, &str)> {
    if let Some(head) = text.strip_suffix(['Z', 'z']) {
        return Some((head, &text[head.len()..]));
    }
    let time_start = text.find(['T', 't']).map_or(0, |i| i + 1);
    let index = text[time_start..].rfind(['+', '-'])? + time_start;
    (index > time_start).then(|| text.split_at(index))
}

/// `HH:MM`, `HH:MM:SS` or `HH:MM:SS` with 3, 6 or 9 fraction digits
pub fn format_local_time(time: &NaiveTime) -> String {
    let mut out = format!("{:02}:{:02}", time.hour(), time.minute());
    let nanos = time.nanosecond() % 1_000_000_000;
    if time.second() == 0 && nanos == 0 {
        return out;
    }
    out.push_str(&format!(":{:02}", time.second()));
    match nanos {
        0 => {}
        n if n % 1_000_000 == 0 => out.push_str(&format!(".{:03}", n / 1_000_000)),
        n if n % 1_000 == 0 => out.push_str(&format!(".{:06}", n / 1_000)),
        n => out.push_str(&format!(".{:09}", n)),
    }
    out
}

pub fn format_local_date(date: &NaiveDate) -> String {
    format!("{}-{:02}-{:02}", Year(date.year()), date.month(), date.day())
}

pub fn format_local_date_time(date_time: &NaiveDateTime) -> String {
    format!("{}T{}", format_local_date(&date_time.date()), format_local_time(&date_time.time()))
}

pub fn format_offset_date_time(date_time: &DateTime<FixedOffset>) -> String {
    format!(
        "{}{}",
        format_local_date_time(&date_time.naive_local()),
        ZoneOffset::from(*date_time.offset())
    )
}

pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
