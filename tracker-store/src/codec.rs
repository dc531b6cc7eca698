//! CSV codec for the activity log.
//!
//! One row per entry, no header:
//!   date,duration,effort,description
//!   2024-06-17,1h30m0s,0.65,"hill run, windy"
//!
//! Decoding is lenient per row: a malformed row is reported and skipped, the
//! rest of the log still loads. Encoding only ever appends.

use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::HashMap;
use std::io;
use thiserror::Error;
use tracing::{debug, warn};

use tracker_core::human_duration::{format_duration, parse_duration, DurationParseError};
use tracker_core::time::{format_date, parse_date, DateParseError};
use tracker_core::{Day, Entry};

use crate::store::ActivityStore;

/// Number of columns in a log row.
pub const FIELD_COUNT: usize = 4;

/// Why a single row was dropped during decode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),
    #[error("invalid date '{value}': {source}")]
    Date {
        value: String,
        #[source]
        source: DateParseError,
    },
    #[error("invalid duration: {0}")]
    Duration(#[from] DurationParseError),
    #[error("invalid effort '{0}'")]
    Effort(String),
    #[error("unreadable record: {0}")]
    Record(String),
}

/// A row that decode skipped, numbered from 1.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: RowError,
}

/// Result of decoding a log: days in no particular order, plus diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub days: Vec<Day>,
    pub skipped: Vec<SkippedRow>,
}

impl Decoded {
    pub fn entry_count(&self) -> usize {
        self.days.iter().map(|d| d.entries.len()).sum()
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("store I/O failed: {0}")]
    Io(#[from] io::Error),
}

fn parse_row(record: &StringRecord) -> Result<(NaiveDate, Entry), RowError> {
    if record.len() != FIELD_COUNT {
        return Err(RowError::FieldCount(record.len()));
    }

    let date = parse_date(&record[0]).map_err(|source| RowError::Date {
        value: record[0].to_string(),
        source,
    })?;

    let duration = parse_duration(&record[1])?;

    let effort: f64 = record[2]
        .trim()
        .parse()
        .ok()
        .filter(|e: &f64| e.is_finite())
        .ok_or_else(|| RowError::Effort(record[2].to_string()))?;

    Ok((date, Entry::new(duration, effort, &record[3])))
}

/// Decode the full content of a log into days.
///
/// Entries are grouped by date; the order of the returned days is unspecified
/// (reconciliation sorts them).
pub fn decode(bytes: &[u8]) -> Decoded {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut per_day: HashMap<NaiveDate, Vec<Entry>> = HashMap::new();
    let mut skipped = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let parsed = result
            .map_err(|e| RowError::Record(e.to_string()))
            .and_then(|record| parse_row(&record));

        match parsed {
            Ok((date, entry)) => per_day.entry(date).or_default().push(entry),
            Err(reason) => {
                warn!(row, %reason, "skipping malformed activity row");
                skipped.push(SkippedRow { row, reason });
            }
        }
    }

    let days = per_day
        .into_iter()
        .map(|(date, entries)| Day::with_entries(date, entries))
        .collect();

    Decoded { days, skipped }
}

/// Serialize entries as log rows.
pub fn encode_rows(entries: &[(NaiveDate, Entry)]) -> Result<Vec<u8>, CodecError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for (date, entry) in entries {
        wtr.write_record([
            format_date(*date),
            format_duration(entry.duration),
            format!("{:.2}", entry.effort),
            entry.description.clone(),
        ])?;
    }

    wtr.into_inner().map_err(|e| CodecError::Io(e.into_error()))
}

/// `existing` followed by the encoded `entries`.
///
/// Prior bytes are kept as they are; a newline is added first only if the
/// existing content does not already end a record.
pub fn encode_append(existing: &[u8], entries: &[(NaiveDate, Entry)]) -> Result<Vec<u8>, CodecError> {
    let rows = encode_rows(entries)?;
    let mut out = Vec::with_capacity(existing.len() + rows.len() + 1);
    out.extend_from_slice(existing);
    if !existing.is_empty() && !existing.ends_with(b"\n") {
        out.push(b'\n');
    }
    out.extend_from_slice(&rows);
    Ok(out)
}

/// Encode `entries` and append them to `store`. Returns the number of rows written.
pub fn encode_and_append<S>(entries: &[(NaiveDate, Entry)], store: &mut S) -> Result<usize, CodecError>
where
    S: ActivityStore + ?Sized,
{
    if entries.is_empty() {
        return Ok(0);
    }
    let existing = store.read_all()?;
    let content = encode_append(&existing, entries)?;
    let suffix = &content[existing.len()..];
    store.append(suffix)?;
    debug!(rows = entries.len(), bytes = suffix.len(), "appended activity rows");
    Ok(entries.len())
}

/// Read and decode everything in `store`.
pub fn read_days<S>(store: &mut S) -> io::Result<Decoded>
where
    S: ActivityStore + ?Sized,
{
    let bytes = store.read_all()?;
    let decoded = decode(&bytes);
    debug!(
        days = decoded.days.len(),
        entries = decoded.entry_count(),
        skipped = decoded.skipped.len(),
        "decoded activity log"
    );
    Ok(decoded)
}
