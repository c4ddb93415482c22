//! Statistics computed over a normalized streaming history.
//!
//! Everything here is a pure function of the input records.

mod aggregate;
mod counter;
mod report;
mod sessions;
mod trends;

pub use aggregate::{
    aggregate, distinct_track_count, AggregateStats, BehaviorStats, ListeningPatterns,
    TopContent, TotalStats, TOP_CONTENT_LIMIT,
};
pub use counter::{first_max_index, OrderedCounter};
pub use report::{analyze, AnalysisReport, EnrichmentSection};
pub use sessions::{compute_sessions, SessionStats, SESSION_GAP_MINUTES};
pub use trends::{build_trends, TrendBlock, TrendSeries, ROLLING_WINDOW_DAYS};

use serde::{Deserialize, Serialize};

/// A label with its play count, used for rankings and histograms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub count: u64,
}

impl NamedCount {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / total` as a percentage rounded to 2 decimals, 0 when `total` is 0.
pub(crate) fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(part as f64 / total as f64 * 100.0)
    }
}
