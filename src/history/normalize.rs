//! Validation of raw export entries into [`NormalizedRecord`]s.

use super::models::{NormalizedRecord, RawPlayRecord, MIN_MS_PLAYED};
use super::HistoryError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

/// Counts reported by a normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub input: usize,
    pub kept: usize,
    pub skipped: usize,
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<NormalizedRecord>,
    pub report: NormalizeReport,
}

/// Why a single entry was dropped. Only used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    Schema,
    MissingTimestamp,
    BadTimestamp,
    MissingDuration,
    TooShort,
    MissingName,
}

/// Validate and clean a parsed export.
///
/// Fails only when the first entry does not look like a streaming-history
/// record at all. Every other bad entry is skipped and counted.
pub fn normalize(raw: &[Value]) -> Result<Normalized, HistoryError> {
    if let Some(first) = raw.first() {
        check_first_record(first)?;
    }

    let mut records = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;

    for (index, value) in raw.iter().enumerate() {
        match normalize_one(value) {
            Ok(record) => records.push(record),
            Err(reason) => {
                debug!("Skipping history entry {}: {:?}", index, reason);
                skipped += 1;
            }
        }
    }

    let report = NormalizeReport {
        input: raw.len(),
        kept: records.len(),
        skipped,
    };
    info!(
        "Normalized history: {} entries in, {} kept, {} skipped",
        report.input, report.kept, report.skipped
    );

    Ok(Normalized { records, report })
}

fn check_first_record(first: &Value) -> Result<(), HistoryError> {
    let Some(object) = first.as_object() else {
        return Err(HistoryError::MalformedInput { field: "ts" });
    };
    for field in ["ts", "ms_played"] {
        if !object.contains_key(field) {
            return Err(HistoryError::MalformedInput { field });
        }
    }
    Ok(())
}

fn normalize_one(value: &Value) -> Result<NormalizedRecord, SkipReason> {
    let raw = RawPlayRecord::deserialize(value).map_err(|_| SkipReason::Schema)?;

    let ts = raw.ts.as_deref().ok_or(SkipReason::MissingTimestamp)?;
    let timestamp = parse_timestamp(ts).ok_or(SkipReason::BadTimestamp)?;
    let ms_played = raw.ms_played.ok_or(SkipReason::MissingDuration)?;
    if ms_played < MIN_MS_PLAYED {
        return Err(SkipReason::TooShort);
    }

    let track_name = clean_text(raw.master_metadata_track_name).ok_or(SkipReason::MissingName)?;
    let artist_name =
        clean_text(raw.master_metadata_album_artist_name).ok_or(SkipReason::MissingName)?;

    Ok(NormalizedRecord {
        timestamp,
        ms_played,
        track_name,
        artist_name,
        album_name: clean_text(raw.master_metadata_album_album_name),
        platform: clean_text(raw.platform),
        track_uri: clean_text(raw.spotify_track_uri),
        skipped: raw.skipped.unwrap_or(false),
        shuffle: raw.shuffle.unwrap_or(false),
        offline: raw.offline.unwrap_or(false),
    })
}

fn clean_text(text: Option<String>) -> Option<String> {
    let text = text?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an export timestamp.
///
/// Accepts RFC 3339 (what exports use) and, as a fallback, naive
/// `YYYY-MM-DD[T ]HH:MM[:SS]` strings interpreted as UTC.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(ts) {
        return Some(parsed.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
        .map(|naive| naive.and_utc())
}
