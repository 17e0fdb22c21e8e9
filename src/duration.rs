//! Kubernetes duration strings.
//!
//! Durations in Kubernetes API objects travel as Go-style duration strings:
//! an optional sign followed by one or more `<decimal><unit>` groups, e.g.
//! `"10ms"`, `"1m30s"`, `"1.5h"`. Valid units are `ns`, `us` (or `µs`),
//! `ms`, `s`, `m` and `h`. The lone string `"0"` is also accepted.
//!
//! [`Duration`] wraps a signed nanosecond count and serializes back to the
//! canonical form (`"1h0m0s"`, `"1.5s"`, `"10ms"`).

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

const NANOS_PER_MICRO: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SEC: i64 = 1_000_000_000;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;

// One `<int>[.<frac>]<unit>` group, anchored at the start of the remainder
static GROUP_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([0-9]*)(?:\.([0-9]*))?([^0-9.]*)").ok());

/// Errors that can occur while parsing a duration string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseDurationError {
    #[error("Failed to compile regex: {0}")]
    RegexCompilation(String),

    #[error("invalid duration: empty string")]
    Empty,

    #[error("invalid duration {0:?}")]
    Invalid(String),

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("duration {0:?} out of range")]
    Overflow(String),
}

/// A signed span of time with nanosecond precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    nanos: i64,
}

impl Duration {
    pub const ZERO: Duration = Duration { nanos: 0 };

    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    pub const fn from_millis(millis: i64) -> Self {
        Self {
            nanos: millis.saturating_mul(NANOS_PER_MILLI),
        }
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self {
            nanos: secs.saturating_mul(NANOS_PER_SEC),
        }
    }

    pub const fn from_mins(mins: i64) -> Self {
        Self {
            nanos: mins.saturating_mul(NANOS_PER_MINUTE),
        }
    }

    pub const fn as_nanos(&self) -> i64 {
        self.nanos
    }

    /// Whole milliseconds, truncated toward zero.
    pub const fn as_millis(&self) -> i64 {
        self.nanos / NANOS_PER_MILLI
    }
}

/// Parse a Kubernetes duration string.
///
/// # Example
/// ```
/// use poison_pill_webhook::duration::{Duration, parse_duration};
///
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// assert_eq!(parse_duration("10ms").unwrap().as_millis(), 10);
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, ParseDurationError> {
    let group_regex = GROUP_RE
        .as_ref()
        .ok_or_else(|| ParseDurationError::RegexCompilation("duration group".to_string()))?;

    if input.is_empty() {
        return Err(ParseDurationError::Empty);
    }

    let (negative, mut rest) = match input.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(ParseDurationError::Invalid(input.to_string()));
    }

    // i64::MIN has no positive counterpart
    let limit = if negative {
        i128::from(i64::MAX) + 1
    } else {
        i128::from(i64::MAX)
    };

    let mut total: i128 = 0;
    while !rest.is_empty() {
        let caps = group_regex
            .captures(rest)
            .ok_or_else(|| ParseDurationError::Invalid(input.to_string()))?;

        let int_part = caps.get(1).map_or("", |m| m.as_str());
        let frac_part = caps.get(2).map_or("", |m| m.as_str());
        let unit = caps.get(3).map_or("", |m| m.as_str());

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseDurationError::Invalid(input.to_string()));
        }
        if unit.is_empty() {
            return Err(ParseDurationError::MissingUnit(input.to_string()));
        }
        let scale = unit_nanos(unit).ok_or_else(|| ParseDurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        total += group_nanos(int_part, frac_part, scale)
            .ok_or_else(|| ParseDurationError::Overflow(input.to_string()))?;
        if total > limit {
            return Err(ParseDurationError::Overflow(input.to_string()));
        }

        let consumed = caps.get(0).map_or(0, |m| m.end());
        rest = rest.get(consumed..).unwrap_or("");
    }

    let nanos = if negative { -total } else { total };
    i64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| ParseDurationError::Overflow(input.to_string()))
}

fn unit_nanos(unit: &str) -> Option<i64> {
    match unit {
        "ns" => Some(1),
        // U+00B5 micro sign and U+03BC Greek small letter mu
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

/// Nanoseconds contributed by a single group. Fraction digits past
/// nanosecond precision are dropped.
fn group_nanos(int_part: &str, frac_part: &str, scale: i64) -> Option<i128> {
    let whole: i128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse::<i64>().ok()?.into()
    };
    let mut nanos = whole.checked_mul(scale.into())?;

    let mut divisor: i128 = 1;
    let mut frac: i128 = 0;
    for digit in frac_part.chars().take(18) {
        frac = frac * 10 + i128::from(digit.to_digit(10)?);
        divisor *= 10;
    }
    if frac > 0 {
        nanos += frac * i128::from(scale) / divisor;
    }
    Some(nanos)
}

impl FromStr for Duration {
    type Err = ParseDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s)
    }
}

/// Writes `int[.frac]` with trailing zeros of the fraction removed.
fn write_decimal(
    f: &mut fmt::Formatter<'_>,
    int: u64,
    frac: u64,
    digits: usize,
) -> fmt::Result {
    write!(f, "{}", int)?;
    if frac > 0 {
        let padded = format!("{:0width$}", frac, width = digits);
        write!(f, ".{}", padded.trim_end_matches('0'))?;
    }
    Ok(())
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos < 0 {
            write!(f, "-")?;
        }
        let total = self.nanos.unsigned_abs();

        const MICRO: u64 = NANOS_PER_MICRO as u64;
        const MILLI: u64 = NANOS_PER_MILLI as u64;
        const SEC: u64 = NANOS_PER_SEC as u64;

        if total < SEC {
            return match total {
                0 => write!(f, "0s"),
                n if n < MICRO => write!(f, "{}ns", n),
                n if n < MILLI => {
                    write_decimal(f, n / MICRO, n % MICRO, 3)?;
                    write!(f, "\u{00b5}s")
                }
                n => {
                    write_decimal(f, n / MILLI, n % MILLI, 6)?;
                    write!(f, "ms")
                }
            };
        }

        let secs = total / SEC;
        let frac = total % SEC;
        let mins = secs / 60;
        let hours = mins / 60;

        if hours > 0 {
            write!(f, "{}h{}m", hours, mins % 60)?;
        } else if mins > 0 {
            write!(f, "{}m", mins)?;
        }
        write_decimal(f, secs % 60, frac, 9)?;
        write!(f, "s")
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_duration(&raw).map_err(de::Error::custom)
    }
}

impl JsonSchema for Duration {
    fn schema_name() -> Cow<'static, str> {
        "Duration".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
        })
    }
}
