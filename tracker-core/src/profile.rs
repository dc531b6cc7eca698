//! User profile and heart-rate reference values.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const HOURS_PER_YEAR: f64 = 24.0 * 365.0;

/// Who is logging, as far as scoring cares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    /// Beats per minute at rest
    #[serde(default)]
    pub resting_heart_rate: f64,
    pub date_of_birth: NaiveDate,
}

impl UserProfile {
    pub fn new(username: impl Into<String>, resting_heart_rate: f64, date_of_birth: NaiveDate) -> Self {
        Self {
            username: username.into(),
            resting_heart_rate,
            date_of_birth,
        }
    }

    /// Age in fractional years at `now`, counting 365-day years.
    pub fn age_years(&self, now: DateTime<Utc>) -> f64 {
        let born = self.date_of_birth.and_time(chrono::NaiveTime::MIN).and_utc();
        let elapsed = now - born;
        (elapsed.num_seconds() as f64 / 3600.0) / HOURS_PER_YEAR
    }

    /// Estimated maximum heart rate: 206.09 - 0.67 x age.
    pub fn maximum_heart_rate(&self, now: DateTime<Utc>) -> f64 {
        206.09 - 0.67 * self.age_years(now)
    }
}
