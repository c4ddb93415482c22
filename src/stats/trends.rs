//! Daily listening trends with trailing rolling averages.

use super::round2;
use crate::history::NormalizedRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Width of the trailing window used for rolling averages.
pub const ROLLING_WINDOW_DAYS: usize = 7;

/// Parallel per-day arrays. All vectors have the same length as `dates`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendBlock {
    /// `YYYY-MM-DD`, ascending.
    pub dates: Vec<String>,
    pub hours_played: Vec<f64>,
    pub tracks_played: Vec<u64>,
    /// Percentages, 0-100.
    pub skip_rate: Vec<f64>,
    pub offline_rate: Vec<f64>,
    pub shuffle_rate: Vec<f64>,
}

impl TrendBlock {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    #[serde(rename = "daily_stats")]
    pub daily: TrendBlock,
    #[serde(rename = "rolling_averages")]
    pub rolling: TrendBlock,
}

#[derive(Default)]
struct DayBucket {
    ms_played: u64,
    plays: u64,
    skipped: u64,
    offline: u64,
    shuffled: u64,
}

/// Unrounded per-day metrics, the input of the rolling average.
struct DailyMetrics {
    hours: f64,
    tracks: f64,
    skip: f64,
    offline: f64,
    shuffle: f64,
}

/// Bucket plays by UTC calendar day and derive the rolling series.
///
/// Only days with at least one play appear. The rolling value for day `i`
/// averages days `max(0, i-6)..=i`, so it never depends on later days.
pub fn build_trends(records: &[NormalizedRecord]) -> TrendSeries {
    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
    for record in records {
        let bucket = buckets.entry(record.date()).or_default();
        bucket.ms_played += record.ms_played;
        bucket.plays += 1;
        bucket.skipped += record.skipped as u64;
        bucket.offline += record.offline as u64;
        bucket.shuffled += record.shuffle as u64;
    }

    let dates: Vec<String> = buckets
        .keys()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();

    let metrics: Vec<DailyMetrics> = buckets
        .values()
        .map(|b| {
            let plays = b.plays as f64;
            DailyMetrics {
                hours: b.ms_played as f64 / 3_600_000.0,
                tracks: plays,
                skip: b.skipped as f64 / plays * 100.0,
                offline: b.offline as f64 / plays * 100.0,
                shuffle: b.shuffled as f64 / plays * 100.0,
            }
        })
        .collect();

    let daily = to_block(dates.clone(), &metrics);
    let rolling = to_block(dates, &rolling_average(&metrics));

    TrendSeries { daily, rolling }
}

fn rolling_average(metrics: &[DailyMetrics]) -> Vec<DailyMetrics> {
    (0..metrics.len())
        .map(|i| {
            let window = &metrics[i.saturating_sub(ROLLING_WINDOW_DAYS - 1)..=i];
            let n = window.len() as f64;
            let mean = |f: fn(&DailyMetrics) -> f64| window.iter().map(f).sum::<f64>() / n;
            DailyMetrics {
                hours: mean(|m| m.hours),
                tracks: mean(|m| m.tracks),
                skip: mean(|m| m.skip),
                offline: mean(|m| m.offline),
                shuffle: mean(|m| m.shuffle),
            }
        })
        .collect()
}

fn to_block(dates: Vec<String>, metrics: &[DailyMetrics]) -> TrendBlock {
    TrendBlock {
        dates,
        hours_played: metrics.iter().map(|m| round2(m.hours)).collect(),
        tracks_played: metrics.iter().map(|m| m.tracks.round() as u64).collect(),
        skip_rate: metrics.iter().map(|m| round2(m.skip)).collect(),
        offline_rate: metrics.iter().map(|m| round2(m.offline)).collect(),
        shuffle_rate: metrics.iter().map(|m| round2(m.shuffle)).collect(),
    }
}
