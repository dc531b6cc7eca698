//! Plain-text rendering of a window and its weekly summary.

use tracker_core::{format_duration, Bucket, ScoreConfig, Summary, Window};

pub fn render_summary(summary: &Summary) -> String {
    let mut s = String::new();
    s.push_str("## Last 7 days\n\n");
    s.push_str(&format!(
        "score: {:.0}% of {} weighted hours{}\n",
        summary.combined_score,
        summary.target_hours,
        if summary.target_met() { " (target met)" } else { "" }
    ));
    s.push_str(&format!(
        "remaining: {} of moderate effort\n",
        format_duration(summary.remaining)
    ));

    for (label, bucket) in [
        ("low", Bucket::Low),
        ("moderate", Bucket::Moderate),
        ("high", Bucket::High),
    ] {
        let total = summary.bucket(bucket);
        s.push_str(&format!(
            "  {:<9} {:>10} {:>5.0}%\n",
            label,
            format_duration(total.duration),
            total.score
        ));
    }

    s.push_str(&format!(
        "heart rate: resting {:.0}, moderate from {:.0} bpm, high from {:.0} bpm\n",
        summary.resting_heart_rate, summary.moderate_heart_rate, summary.high_heart_rate
    ));
    s
}

pub fn render_window(window: &Window, config: &ScoreConfig) -> String {
    let mut s = String::from("## Log\n\n");
    for day in window {
        s.push_str(&format!("{}\n", day.date.format("%Y-%m-%d %a")));
        if day.is_empty() {
            s.push_str("  (nothing logged)\n");
            continue;
        }
        for e in &day.entries {
            s.push_str(&format!(
                "  - {:>8}  {:<8}  {:.2}  {}\n",
                format_duration(e.duration),
                config.tier(e.effort).label(),
                e.effort,
                e.description
            ));
        }
    }
    s
}
