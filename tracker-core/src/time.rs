//! Time utilities: calendar dates in the `YYYY-MM-DD` form and
//! timezone-aware "today".

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// The only date layout used on disk and on the command line.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// chrono alone accepts "2024-6-7" and "+2024-06-17" for DATE_FORMAT.
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date layout is a valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("expected YYYY-MM-DD")]
    Layout,
    #[error(transparent)]
    Calendar(#[from] chrono::ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timezone: {0}")]
pub struct UnknownTimezone(pub String);

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(name: &str) -> Result<Tz, UnknownTimezone> {
    name.trim()
        .parse()
        .map_err(|_| UnknownTimezone(name.to_string()))
}

/// Parse a `YYYY-MM-DD` date: four-digit year, two-digit month and day.
pub fn parse_date(s: &str) -> Result<NaiveDate, DateParseError> {
    let s = s.trim();
    if !DATE_RE.is_match(s) {
        return Err(DateParseError::Layout);
    }
    Ok(NaiveDate::parse_from_str(s, DATE_FORMAT)?)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Calendar date of `now` as seen from `tz`.
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}
