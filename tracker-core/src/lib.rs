//! tracker-core: data model, day reconciliation and weekly effort scoring
//! for the activity tracker. Pure and synchronous; no I/O.

pub mod entry;
pub mod human_duration;
pub mod profile;
pub mod reconcile;
pub mod score;
pub mod time;

pub use entry::{Day, Entry};
pub use human_duration::{format_duration, parse_duration, DurationParseError};
pub use profile::UserProfile;
pub use reconcile::{reconcile, reconcile_at, ReconcileError, Window, WINDOW_DAYS};
pub use score::{summarize, Bucket, BucketTotal, EffortTier, ScoreConfig, Summary};

/// Days covered by the weekly summary.
pub const SUMMARY_DAYS: usize = 7;
