//! Weekly effort scoring.
//!
//! Entries are sorted into low / moderate / high intensity buckets by their
//! effort value. Each bucket's hours are weighted (low counts for a fraction
//! of moderate, high for double) and compared against a weekly target of
//! moderate-equivalent hours. A combined score of 100 means the target is met.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{Day, Entry};
use crate::human_duration::serde_human;
use crate::profile::UserProfile;

/// Effort at or above this counts as "light" rather than rest, for display.
pub const LIGHT_FLOOR: f64 = 0.2;

/// Intensity classification used for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "high")]
    High,
}

/// Finer classification for display. Scoring only sees [`Bucket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffortTier {
    #[serde(rename = "vigorous")]
    Vigorous,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "light")]
    Light,
    #[serde(rename = "rest")]
    Rest,
}

impl EffortTier {
    pub fn label(&self) -> &'static str {
        match self {
            EffortTier::Vigorous => "vigorous",
            EffortTier::Moderate => "moderate",
            EffortTier::Light => "light",
            EffortTier::Rest => "rest",
        }
    }
}

/// Thresholds, weights and the weekly goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Effort at or above this is moderate intensity
    pub moderate_floor: f64,
    /// Effort at or above this is high intensity
    pub high_floor: f64,
    /// Weekly goal in moderate-equivalent hours
    pub minimum_moderate_hours_per_week: f64,
    pub low_weight: f64,
    pub moderate_weight: f64,
    pub high_weight: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            moderate_floor: 0.5,
            high_floor: 0.7,
            minimum_moderate_hours_per_week: 2.5,
            low_weight: 0.2,
            moderate_weight: 1.0,
            high_weight: 2.0,
        }
    }
}

impl ScoreConfig {
    pub fn bucket(&self, effort: f64) -> Bucket {
        if effort >= self.high_floor {
            Bucket::High
        } else if effort >= self.moderate_floor {
            Bucket::Moderate
        } else {
            Bucket::Low
        }
    }

    pub fn tier(&self, effort: f64) -> EffortTier {
        match self.bucket(effort) {
            Bucket::High => EffortTier::Vigorous,
            Bucket::Moderate => EffortTier::Moderate,
            Bucket::Low if effort >= LIGHT_FLOOR => EffortTier::Light,
            Bucket::Low => EffortTier::Rest,
        }
    }

    pub fn weight(&self, bucket: Bucket) -> f64 {
        match bucket {
            Bucket::Low => self.low_weight,
            Bucket::Moderate => self.moderate_weight,
            Bucket::High => self.high_weight,
        }
    }

    /// Target in weighted hours for a span of `days` days.
    pub fn target_hours(&self, days: usize) -> f64 {
        self.minimum_moderate_hours_per_week * days as f64 / 7.0
    }
}

/// Accumulated time and score for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketTotal {
    #[serde(with = "serde_human")]
    pub duration: Duration,
    /// Percent of target contributed by this bucket
    pub score: f64,
}

impl Default for BucketTotal {
    fn default() -> Self {
        Self {
            duration: Duration::zero(),
            score: 0.0,
        }
    }
}

/// Derived view over the most recent days. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub resting_heart_rate: f64,
    /// Lower bound of the moderate heart-rate zone, BPM
    pub moderate_heart_rate: f64,
    /// Lower bound of the high heart-rate zone, BPM
    pub high_heart_rate: f64,
    pub low: BucketTotal,
    pub moderate: BucketTotal,
    pub high: BucketTotal,
    /// Sum of the bucket scores; 100 means the target is met
    pub combined_score: f64,
    /// Weighted-hour goal for the summarized span
    pub target_hours: f64,
    /// Moderate-effort time still needed, whole minutes
    #[serde(with = "serde_human")]
    pub remaining: Duration,
}

impl Summary {
    pub fn bucket(&self, bucket: Bucket) -> &BucketTotal {
        match bucket {
            Bucket::Low => &self.low,
            Bucket::Moderate => &self.moderate,
            Bucket::High => &self.high,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut BucketTotal {
        match bucket {
            Bucket::Low => &mut self.low,
            Bucket::Moderate => &mut self.moderate,
            Bucket::High => &mut self.high,
        }
    }

    pub fn target_met(&self) -> bool {
        self.combined_score >= 100.0
    }
}

fn hours(d: Duration) -> f64 {
    d.num_seconds() as f64 / 3600.0 + d.subsec_nanos() as f64 / 3.6e12
}

/// Score `days` (normally the 7 most recent days of a window) for `profile`.
///
/// `now` is only used for the age-based heart-rate references.
pub fn summarize(
    days: &[Day],
    profile: &UserProfile,
    now: DateTime<Utc>,
    config: &ScoreConfig,
) -> Summary {
    let max_heart_rate = profile.maximum_heart_rate(now);

    let mut s = Summary {
        resting_heart_rate: profile.resting_heart_rate,
        moderate_heart_rate: max_heart_rate * config.moderate_floor,
        high_heart_rate: max_heart_rate * config.high_floor,
        low: BucketTotal::default(),
        moderate: BucketTotal::default(),
        high: BucketTotal::default(),
        combined_score: 0.0,
        target_hours: config.target_hours(days.len()),
        remaining: Duration::zero(),
    };

    for entry in days.iter().flat_map(|d| d.entries.iter()) {
        add_entry(&mut s, entry, config);
    }

    // weighted hours first, percentages after the remaining time is known
    for bucket in [Bucket::Low, Bucket::Moderate, Bucket::High] {
        let total = s.bucket_mut(bucket);
        total.score = config.weight(bucket) * hours(total.duration);
    }
    let weighted = s.low.score + s.moderate.score + s.high.score;

    let remaining_minutes = (60.0 * (s.target_hours - weighted)).floor().max(0.0);
    s.remaining = Duration::minutes(remaining_minutes as i64);

    let to_percent = if s.target_hours > 0.0 {
        100.0 / s.target_hours
    } else {
        0.0
    };
    s.low.score *= to_percent;
    s.moderate.score *= to_percent;
    s.high.score *= to_percent;
    s.combined_score = s.low.score + s.moderate.score + s.high.score;

    s
}

fn add_entry(s: &mut Summary, entry: &Entry, config: &ScoreConfig) {
    let total = s.bucket_mut(config.bucket(entry.effort));
    total.duration = total.duration + entry.duration;
}
