//! Day reconciliation: turn a sparse, unordered set of days into a dense,
//! newest-first window ending at a reference date.
//!
//! The window always covers the reference date and the 13 days before it.
//! Older logged days are never dropped; the window stretches back to the
//! earliest one instead, filling every gap with an empty day.

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::entry::{Day, Entry};

/// Number of days in a default window, reference date included.
pub const WINDOW_DAYS: u64 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("day {date} is after the reference date {reference}")]
    AfterReference { date: NaiveDate, reference: NaiveDate },
}

/// Contiguous days in strictly descending date order, no duplicates.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Window {
    days: Vec<Day>,
}

impl Window {
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn into_days(self) -> Vec<Day> {
        self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Day> {
        self.days.iter()
    }

    /// The newest day, i.e. the reference date.
    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }

    /// The `n` most recent days (fewer if the window is shorter).
    pub fn recent(&self, n: usize) -> &[Day] {
        &self.days[..n.min(self.days.len())]
    }
}

impl<'a> IntoIterator for &'a Window {
    type Item = &'a Day;
    type IntoIter = std::slice::Iter<'a, Day>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

/// Build the window ending at `reference`.
///
/// Days that share a date are merged. A day dated after `reference` is an
/// error: it cannot be placed without breaking the ordering.
pub fn reconcile<I>(days: I, reference: NaiveDate) -> Result<Window, ReconcileError>
where
    I: IntoIterator<Item = Day>,
{
    let mut by_date: BTreeMap<NaiveDate, Vec<Entry>> = BTreeMap::new();
    for day in days {
        if day.date > reference {
            return Err(ReconcileError::AfterReference {
                date: day.date,
                reference,
            });
        }
        by_date.entry(day.date).or_default().extend(day.entries);
    }

    let mut floor = reference
        .checked_sub_days(Days::new(WINDOW_DAYS - 1))
        .unwrap_or(NaiveDate::MIN);
    if let Some((&earliest, _)) = by_date.first_key_value() {
        floor = floor.min(earliest);
    }

    let span = (reference - floor).num_days() as usize + 1;
    let mut out = Vec::with_capacity(span);
    let mut date = reference;
    loop {
        let entries = by_date.remove(&date).unwrap_or_default();
        out.push(Day::with_entries(date, entries));
        if date <= floor {
            break;
        }
        match date.pred_opt() {
            Some(prev) => date = prev,
            None => break,
        }
    }

    Ok(Window { days: out })
}

/// Same as [`reconcile`], with the reference taken from a timestamp.
///
/// Time of day and offset are dropped; the local calendar date is kept.
pub fn reconcile_at<I, Tz>(days: I, now: &DateTime<Tz>) -> Result<Window, ReconcileError>
where
    I: IntoIterator<Item = Day>,
    Tz: TimeZone,
{
    reconcile(days, now.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn past_14_days() -> Vec<Day> {
        (4..=17).rev().map(|d| Day::empty(date(2024, 6, d))).collect()
    }

    fn assert_contiguous(window: &Window, reference: NaiveDate) {
        assert_eq!(window.reference_date(), Some(reference));
        for pair in window.days().windows(2) {
            assert_eq!(pair[0].date - pair[1].date, Duration::days(1));
        }
    }

    #[test]
    fn test_fill_in_dates() {
        let today = Utc.with_ymd_and_hms(2024, 6, 17, 11, 4, 0).unwrap();

        let cases: Vec<(&str, Vec<Day>, Vec<Day>)> = vec![
            ("empty", vec![], past_14_days()),
            ("just-today", vec![Day::empty(date(2024, 6, 17))], past_14_days()),
            ("just-yesterday", vec![Day::empty(date(2024, 6, 16))], past_14_days()),
            (
                "couple-days",
                vec![Day::empty(date(2024, 6, 16)), Day::empty(date(2024, 6, 15))],
                past_14_days(),
            ),
            (
                "gap",
                vec![Day::empty(date(2024, 6, 14)), Day::empty(date(2024, 6, 16))],
                past_14_days(),
            ),
            ("past-14-days", vec![Day::empty(date(2024, 6, 2))], {
                let mut want = past_14_days();
                want.push(Day::empty(date(2024, 6, 3)));
                want.push(Day::empty(date(2024, 6, 2)));
                want
            }),
        ];

        for (name, input, want) in cases {
            let got = reconcile_at(input, &today).unwrap();
            assert_eq!(got.days(), want.as_slice(), "case {name}");
            assert_contiguous(&got, date(2024, 6, 17));
        }
    }

    #[test]
    fn test_entries_land_on_their_date() {
        let input = vec![
            Day::with_entries(
                date(2024, 6, 10),
                vec![Entry::new(Duration::minutes(30), 0.6, "swim")],
            ),
            Day::with_entries(
                date(2024, 6, 10),
                vec![Entry::new(Duration::minutes(20), 0.3, "walk")],
            ),
        ];

        let window = reconcile(input, date(2024, 6, 17)).unwrap();
        assert_eq!(window.len(), 14);
        let day = window.iter().find(|d| d.date == date(2024, 6, 10)).unwrap();
        assert_eq!(day.entries.len(), 2);
        assert_eq!(window.iter().filter(|d| !d.is_empty()).count(), 1);
    }

    #[test]
    fn test_full_window_is_unchanged() {
        let reference = date(2024, 6, 17);
        let first = reconcile(
            vec![Day::with_entries(
                date(2024, 6, 12),
                vec![Entry::new(Duration::hours(1), 0.9, "intervals")],
            )],
            reference,
        )
        .unwrap();
        let second = reconcile(first.clone().into_days(), reference).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extends_back_far() {
        let reference = date(2024, 6, 17);
        let window = reconcile(vec![Day::empty(date(2024, 5, 1))], reference).unwrap();
        assert_eq!(window.len(), 48);
        assert_eq!(window.earliest_date(), Some(date(2024, 5, 1)));
        assert_contiguous(&window, reference);
    }

    #[test]
    fn test_future_day_is_rejected() {
        let err = reconcile(vec![Day::empty(date(2024, 6, 18))], date(2024, 6, 17)).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::AfterReference {
                date: date(2024, 6, 18),
                reference: date(2024, 6, 17),
            }
        );
    }

    #[test]
    fn test_recent_prefix() {
        let window = reconcile(Vec::new(), date(2024, 6, 17)).unwrap();
        let week = window.recent(7);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date(2024, 6, 17));
        assert_eq!(week[6].date, date(2024, 6, 11));
        assert_eq!(window.recent(100).len(), 14);
    }
}
