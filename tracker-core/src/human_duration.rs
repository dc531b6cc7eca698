//! Human-readable durations such as `1h30m0s`, `90m` or `1.5h`.
//!
//! The log stores durations in this unit-suffixed form, so parse and format
//! must agree exactly: `parse(&format(d)) == d` for every non-negative
//! duration at nanosecond resolution.

use chrono::Duration;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MINUTE;

// Longer units first so that "ms" is never read as "m" followed by garbage.
static FULL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?(?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|μs|ms|h|m|s))+$")
        .expect("duration grammar is a valid regex")
});

static GROUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<whole>\d*)(?:\.(?P<frac>\d*))?(?P<unit>ns|us|µs|μs|ms|h|m|s)")
        .expect("duration group is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,
    #[error("negative duration '{0}'")]
    Negative(String),
    #[error("invalid duration '{0}'")]
    Invalid(String),
    #[error("duration '{0}' is out of range")]
    Overflow(String),
}

fn unit_nanos(unit: &str) -> u64 {
    match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => NANOS_PER_MICRO,
        "ms" => NANOS_PER_MILLI,
        "s" => NANOS_PER_SECOND,
        "m" => NANOS_PER_MINUTE,
        _ => NANOS_PER_HOUR,
    }
}

/// Parse a unit-suffixed duration like `1h30m`, `45m`, `1.5h` or `300ms`.
///
/// A bare `0` is zero. Negative durations are rejected.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }
    if s.starts_with('-') {
        return Err(DurationParseError::Negative(s.to_string()));
    }
    if s == "0" || s == "+0" {
        return Ok(Duration::zero());
    }
    if !FULL_RE.is_match(s) {
        return Err(DurationParseError::Invalid(s.to_string()));
    }

    let overflow = || DurationParseError::Overflow(s.to_string());
    let mut total: u64 = 0;

    for caps in GROUP_RE.captures_iter(s) {
        let unit = unit_nanos(&caps["unit"]);

        let whole_str = &caps["whole"];
        let whole: u64 = if whole_str.is_empty() {
            0
        } else {
            whole_str.parse().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(unit).ok_or_else(overflow)?;

        if let Some(frac) = caps.name("frac").map(|m| m.as_str()).filter(|f| !f.is_empty()) {
            // Digits past 18 cannot change the result at nanosecond resolution.
            let digits = &frac[..frac.len().min(18)];
            let numerator: u128 = digits.parse().map_err(|_| overflow())?;
            let denominator = 10u128.pow(digits.len() as u32);
            let part = numerator * unit as u128 / denominator;
            nanos = nanos.checked_add(part as u64).ok_or_else(overflow)?;
        }

        total = total.checked_add(nanos).ok_or_else(overflow)?;
    }

    let total = i64::try_from(total).map_err(|_| overflow())?;
    Ok(Duration::nanoseconds(total))
}

/// Format a duration in the canonical form read back by [`parse_duration`].
///
/// `0s`, `750ms`, `1.5µs`, `2m30s`, `1h0m0s`, `1h30m0.25s`.
pub fn format_duration(d: Duration) -> String {
    if d < Duration::zero() {
        return format!("-{}", format_duration(d.abs()));
    }

    let secs = d.num_seconds() as u64;
    let sub = d.subsec_nanos() as u64;

    if secs == 0 {
        return match sub {
            0 => "0s".to_string(),
            n if n < NANOS_PER_MICRO => format!("{n}ns"),
            n if n < NANOS_PER_MILLI => {
                format!("{}µs", with_fraction(n / NANOS_PER_MICRO, n % NANOS_PER_MICRO, 3))
            }
            n => format!("{}ms", with_fraction(n / NANOS_PER_MILLI, n % NANOS_PER_MILLI, 6)),
        };
    }

    let mut out = String::new();
    if secs >= 3600 {
        out.push_str(&format!("{}h", secs / 3600));
    }
    if secs >= 60 {
        out.push_str(&format!("{}m", secs / 60 % 60));
    }
    out.push_str(&with_fraction(secs % 60, sub, 9));
    out.push('s');
    out
}

fn with_fraction(whole: u64, frac: u64, width: usize) -> String {
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Serde adapter storing a duration as its human-readable string.
pub mod serde_human {
    use super::{format_duration, parse_duration};
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
