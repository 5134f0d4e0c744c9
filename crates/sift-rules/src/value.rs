//! Runtime value types for field comparison.
//!
//! The [`Value`] enum represents the value of a field read from a record.
//! Records hand out borrowed values; rules own their typed operands
//! (see [`TypedValue`](crate::TypedValue)).

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Runtime value of a record field, borrowed from the record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    Text(&'a str),
    /// Numeric value.
    Number(Number),
    /// Already-parsed date.
    Date(Timestamp),
    /// Multi-valued text field, such as tags.
    List(Vec<&'a str>),
    /// Field not present, null, or unsupported.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(*s),
            _ => None,
        }
    }

    /// Reads the value as a number, parsing numeric text.
    pub fn as_number_lossy(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => Number::parse(s),
            _ => None,
        }
    }

    /// Reads the value as a timestamp.
    ///
    /// Numbers are taken as milliseconds since the Unix epoch; text is parsed
    /// with [`Timestamp::parse`].
    pub fn as_timestamp_lossy(&self) -> Option<Timestamp> {
        match self {
            Value::Date(ts) => Some(*ts),
            Value::Number(Number::I64(n)) => Some(Timestamp(*n)),
            Value::Number(Number::U64(n)) => i64::try_from(*n).ok().map(Timestamp),
            Value::Number(Number::F64(_)) => None,
            Value::Text(s) => Timestamp::parse(s).map(|(ts, _)| ts),
            Value::List(_) | Value::None => None,
        }
    }

    /// The textual pieces of this value: one for scalars, one per element
    /// for lists, none for `None`.
    pub fn texts(&self) -> Vec<String> {
        match self {
            Value::Text(s) => vec![(*s).to_string()],
            Value::Number(n) => vec![n.to_string()],
            Value::Date(ts) => vec![ts.to_string()],
            Value::List(items) => items.iter().map(|s| (*s).to_string()).collect(),
            Value::None => Vec::new(),
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision.
/// Comparisons between different variants go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Parses trimmed text: integers first, then finite decimals.
    pub fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        if let Ok(n) = text.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Some(Number::U64(n));
        }
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(Number::F64(n)),
            _ => None,
        }
    }

    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

/// Timestamp value represented as milliseconds since the Unix epoch (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

const MILLIS_PER_DAY: i64 = 86_400_000;

impl Timestamp {
    /// Sorts before every parseable date; used for missing dates.
    pub const OLDEST: Timestamp = Timestamp(i64::MIN);

    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Parses a date or date-time.
    ///
    /// Accepts RFC 3339, `YYYY-MM-DD`, and `YYYY-MM-DD HH:MM[:SS]` with a space
    /// or `T` separator. Values without an offset are read as UTC. The flag is
    /// `true` when the input carried no time of day.
    pub fn parse(text: &str) -> Option<(Timestamp, bool)> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some((Timestamp(dt.timestamp_millis()), false));
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return Some((Timestamp(midnight.and_utc().timestamp_millis()), true));
        }
        const FORMATS: &[&str] = &[
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M",
            "%Y-%m-%dT%H:%M",
        ];
        FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map(|dt| (Timestamp(dt.and_utc().timestamp_millis()), false))
    }

    /// Last millisecond of the UTC day containing this timestamp.
    pub fn end_of_day(self) -> Timestamp {
        let start = self.0.div_euclid(MILLIS_PER_DAY) * MILLIS_PER_DAY;
        Timestamp(start + MILLIS_PER_DAY - 1)
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}", self.0),
        }
    }
}
