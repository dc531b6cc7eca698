//! Logged activity entries and the calendar days that group them.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::human_duration::serde_human;

/// One logged activity occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// How long the activity lasted
    #[serde(with = "serde_human")]
    pub duration: Duration,
    /// Perceived effort, nominally 0.0 - 1.0 (not clamped)
    pub effort: f64,
    /// Free-form text
    pub description: String,
}

impl Entry {
    pub fn new(duration: Duration, effort: f64, description: impl Into<String>) -> Self {
        Self {
            duration,
            effort,
            description: description.into(),
        }
    }
}

/// A calendar date and everything logged on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Day {
    /// A day with nothing logged.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
        }
    }

    pub fn with_entries(date: NaiveDate, entries: Vec<Entry>) -> Self {
        Self { date, entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of entry durations for the day.
    pub fn total_duration(&self) -> Duration {
        self.entries
            .iter()
            .fold(Duration::zero(), |acc, e| acc + e.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_totals() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 17).unwrap();
        let day = Day::with_entries(
            date,
            vec![
                Entry::new(Duration::minutes(30), 0.4, "walk"),
                Entry::new(Duration::minutes(45), 0.8, "run"),
            ],
        );
        assert!(!day.is_empty());
        assert_eq!(day.total_duration(), Duration::minutes(75));
        assert!(Day::empty(date).is_empty());
        assert_eq!(Day::empty(date).total_duration(), Duration::zero());
    }

    #[test]
    fn test_entry_json_uses_human_duration() {
        let entry = Entry::new(Duration::minutes(90), 0.5, "bike");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"1h30m0s\""), "{json}");
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
