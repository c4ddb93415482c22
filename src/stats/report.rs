//! The combined statistics payload handed to presentation layers.

use super::aggregate::{aggregate, AggregateStats};
use super::sessions::{compute_sessions, SessionStats};
use super::trends::{build_trends, TrendSeries};
use crate::enrichment::{EnrichedTrack, EnrichmentSummary};
use crate::history::NormalizedRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub stats: AggregateStats,
    pub session_stats: SessionStats,
    pub trends: TrendSeries,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EnrichmentSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentSection {
    pub summary: EnrichmentSummary,
    pub tracks: Vec<EnrichedTrack>,
}

impl AnalysisReport {
    /// Attach enrichment results computed separately from the statistics.
    pub fn with_enrichment(mut self, tracks: Vec<EnrichedTrack>) -> Self {
        let summary = EnrichmentSummary::from_tracks(&tracks);
        self.enrichment = Some(EnrichmentSection { summary, tracks });
        self
    }
}

/// Run every statistics stage over `records`.
pub fn analyze(records: &[NormalizedRecord]) -> AnalysisReport {
    AnalysisReport {
        stats: aggregate(records),
        session_stats: compute_sessions(records),
        trends: build_trends(records),
        enrichment: None,
    }
}
