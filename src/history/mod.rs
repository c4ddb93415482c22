//! Streaming history import: schema, normalization, loading and merging.

mod load;
mod merge;
mod models;
mod normalize;

pub use load::{load_history_file, load_history_files, parse_history};
pub use merge::{merge, merge_all};
pub use models::*;
pub use normalize::{normalize, parse_timestamp, Normalized, NormalizeReport};

use thiserror::Error;

/// Errors that abort an import.
///
/// Individual bad records never produce one of these, they are dropped and
/// counted in [`NormalizeReport`].
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Not a streaming history file: first record is missing '{field}'")]
    MalformedInput { field: &'static str },

    #[error("Not a streaming history file: expected a JSON array")]
    NotAnArray,

    #[error("Failed to read history file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse history file: {0}")]
    Json(#[from] serde_json::Error),
}
