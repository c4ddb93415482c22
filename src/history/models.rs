//! Data models for streaming history records.
//!
//! `RawPlayRecord` matches the JSON structure of the streaming-history export,
//! `NormalizedRecord` is the validated form every downstream stage consumes.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Plays shorter than this are treated as low-signal and dropped.
pub const MIN_MS_PLAYED: u64 = 30_000;

/// Day names in the order used for histograms and peak tie-breaks.
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// =============================================================================
// Export Schema
// =============================================================================

/// One entry of a streaming-history export, as found on disk.
///
/// Only `ts` and `ms_played` are required for a record to be usable, every
/// other field may be absent or null.
#[derive(Clone, Debug, Deserialize, Serialize, Default)]
pub struct RawPlayRecord {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub ts: Option<String>,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub ms_played: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub master_metadata_track_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub master_metadata_album_artist_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub master_metadata_album_album_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub spotify_track_uri: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub shuffle: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub skipped: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub offline: Option<bool>,
}

/// Exports are not consistent about flag types: older files carry `null`,
/// some tools rewrite them as `0`/`1` or `"true"`/`"false"`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Text fields of any other JSON type are treated as absent.
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Whole milliseconds. Integral floats (`200000.0`) are accepted, negative or
/// fractional values are not.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        _ => None,
    })
}

// =============================================================================
// Normalized Record
// =============================================================================

/// A validated play with trimmed names and coerced flags.
///
/// Calendar fields (date, hour, weekday, month) are derived from `timestamp`
/// on access and are never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub timestamp: DateTime<Utc>,
    pub ms_played: u64,
    pub track_name: String,
    pub artist_name: String,
    pub album_name: Option<String>,
    pub platform: Option<String>,
    pub track_uri: Option<String>,
    pub skipped: bool,
    pub shuffle: bool,
    pub offline: bool,
}

impl NormalizedRecord {
    /// Calendar date in UTC.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Calendar date formatted as `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        self.date().format("%Y-%m-%d").to_string()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Index into [`DAY_NAMES`], 0 = Monday.
    pub fn weekday_index(&self) -> usize {
        self.timestamp.weekday().num_days_from_monday() as usize
    }

    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[self.weekday_index()]
    }

    /// Month number, 1-12.
    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }

    pub fn minutes_played(&self) -> f64 {
        self.ms_played as f64 / 60_000.0
    }

    pub fn hours_played(&self) -> f64 {
        self.ms_played as f64 / 3_600_000.0
    }

    /// Bare track id extracted from a `spotify:track:<id>` reference.
    pub fn track_id(&self) -> Option<&str> {
        self.track_uri.as_deref().and_then(track_id_from_uri)
    }
}

/// Extract the id from `spotify:track:<id>` or `https://open.spotify.com/track/<id>`.
pub fn track_id_from_uri(uri: &str) -> Option<&str> {
    let uri = uri.trim();
    let id = if let Some(rest) = uri.strip_prefix("spotify:track:") {
        rest
    } else if let Some(pos) = uri.find("open.spotify.com/track/") {
        let rest = &uri[pos + "open.spotify.com/track/".len()..];
        rest.split(['?', '/']).next().unwrap_or_default()
    } else {
        return None;
    };
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
