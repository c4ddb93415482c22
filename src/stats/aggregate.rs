//! Scalar and distribution statistics over a normalized history.

use super::counter::{first_max_index, OrderedCounter};
use super::{percentage, round2, NamedCount};
use crate::history::{NormalizedRecord, DAY_NAMES};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Length of every top-content ranking.
pub const TOP_CONTENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalStats {
    pub total_listening_hours: f64,
    pub total_listening_minutes: f64,
    pub total_tracks_played: u64,
    pub unique_artists: u64,
    pub unique_albums: u64,
    pub unique_tracks: u64,
    pub average_track_length_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListeningPatterns {
    /// Hour (0-23) with the most plays; earliest hour wins ties.
    pub peak_hour: u32,
    /// Day name with the most plays; earliest day from Monday wins ties.
    pub peak_day: String,
    /// Plays per hour of day, index = hour.
    pub hourly_distribution: [u64; 24],
    /// Plays per day of week, Monday first.
    pub daily_distribution: Vec<NamedCount>,
    /// Plays per month, index 0 = January.
    pub monthly_distribution: [u64; 12],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorStats {
    pub skip_rate: f64,
    pub offline_rate: f64,
    pub shuffle_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopContent {
    pub top_artists: Vec<NamedCount>,
    pub top_tracks: Vec<NamedCount>,
    pub top_albums: Vec<NamedCount>,
}

/// Snapshot of statistics over a record set. Computed fresh by [`aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_stats: TotalStats,
    pub listening_patterns: ListeningPatterns,
    pub behavior_stats: BehaviorStats,
    /// Plays per platform label, in first-seen order.
    pub platform_stats: Vec<NamedCount>,
    pub top_content: TopContent,
}

/// Compute statistics over `records` in a single pass.
///
/// Empty input yields zeroed stats with peak hour 0 and peak day "Monday".
pub fn aggregate(records: &[NormalizedRecord]) -> AggregateStats {
    let mut total_ms: u64 = 0;
    let mut hourly = [0u64; 24];
    let mut daily = [0u64; 7];
    let mut monthly = [0u64; 12];
    let mut skipped = 0u64;
    let mut offline = 0u64;
    let mut shuffled = 0u64;

    let mut artists = OrderedCounter::new();
    let mut tracks = OrderedCounter::new();
    let mut albums = OrderedCounter::new();
    let mut platforms = OrderedCounter::new();

    for record in records {
        total_ms += record.ms_played;
        hourly[record.hour() as usize] += 1;
        daily[record.weekday_index()] += 1;
        monthly[record.month() as usize - 1] += 1;

        skipped += record.skipped as u64;
        offline += record.offline as u64;
        shuffled += record.shuffle as u64;

        artists.add(&record.artist_name);
        tracks.add(&record.track_name);
        if let Some(album) = &record.album_name {
            albums.add(album);
        }
        if let Some(platform) = &record.platform {
            platforms.add(platform);
        }
    }

    let count = records.len() as u64;
    let average_ms = if count == 0 {
        0.0
    } else {
        total_ms as f64 / count as f64
    };

    let total_stats = TotalStats {
        total_listening_hours: round2(total_ms as f64 / 3_600_000.0),
        total_listening_minutes: round2(total_ms as f64 / 60_000.0),
        total_tracks_played: count,
        unique_artists: artists.len() as u64,
        unique_albums: albums.len() as u64,
        unique_tracks: tracks.len() as u64,
        average_track_length_seconds: round2(average_ms / 1000.0),
    };

    let listening_patterns = ListeningPatterns {
        peak_hour: first_max_index(&hourly) as u32,
        peak_day: DAY_NAMES[first_max_index(&daily)].to_string(),
        hourly_distribution: hourly,
        daily_distribution: DAY_NAMES
            .iter()
            .zip(daily.iter())
            .map(|(name, &count)| NamedCount::new(*name, count))
            .collect(),
        monthly_distribution: monthly,
    };

    let behavior_stats = BehaviorStats {
        skip_rate: percentage(skipped, count),
        offline_rate: percentage(offline, count),
        shuffle_rate: percentage(shuffled, count),
    };

    let top_content = TopContent {
        top_artists: to_named(artists.top(TOP_CONTENT_LIMIT)),
        top_tracks: to_named(tracks.top(TOP_CONTENT_LIMIT)),
        top_albums: to_named(albums.top(TOP_CONTENT_LIMIT)),
    };

    AggregateStats {
        total_stats,
        listening_patterns,
        behavior_stats,
        platform_stats: to_named(platforms.into_entries()),
        top_content,
    }
}

fn to_named(entries: Vec<(String, u64)>) -> Vec<NamedCount> {
    entries
        .into_iter()
        .map(|(name, count)| NamedCount { name, count })
        .collect()
}

/// Number of distinct `(artist, track)` pairs, case-insensitive.
///
/// `unique_tracks` follows the export's track-name column; this is the
/// stricter count used when sizing enrichment work.
pub fn distinct_track_count(records: &[NormalizedRecord]) -> usize {
    records
        .iter()
        .map(|r| (r.artist_name.to_lowercase(), r.track_name.to_lowercase()))
        .collect::<HashSet<_>>()
        .len()
}
