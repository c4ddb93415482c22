//! Spotify Streaming History Analyzer Library
//!
//! Imports extended streaming history exports, computes listening statistics
//! and optionally enriches the most played tracks with genre and audio
//! feature metadata.

pub mod config;
pub mod enrichment;
pub mod history;
pub mod stats;

// Re-export commonly used types for convenience
pub use enrichment::{build_resolver, select_top_tracks, EnrichedTrack, EnrichmentEngine};
pub use history::{load_history_files, merge, normalize, HistoryError, NormalizedRecord};
pub use stats::{aggregate, analyze, build_trends, AnalysisReport};
