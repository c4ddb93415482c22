//! Reading streaming history exports from disk.

use super::merge::merge_all;
use super::normalize::{normalize, Normalized, NormalizeReport};
use super::HistoryError;
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Parse the content of an export file and normalize it.
pub fn parse_history(content: &str) -> Result<Normalized, HistoryError> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(entries) = value else {
        return Err(HistoryError::NotAnArray);
    };
    normalize(&entries)
}

/// Load and normalize one export file.
pub fn load_history_file(path: &Path) -> Result<Normalized, HistoryError> {
    info!("Loading streaming history from {:?}...", path);
    let content = std::fs::read_to_string(path)?;
    parse_history(&content)
}

/// Load several export files and merge them into one deduplicated history.
///
/// Exports are usually split into yearly files, and re-exports overlap with
/// older ones, so plays appearing in more than one file are kept once.
pub fn load_history_files<P: AsRef<Path>>(paths: &[P]) -> Result<Normalized, HistoryError> {
    let mut batches = Vec::with_capacity(paths.len());
    let mut report = NormalizeReport::default();

    for path in paths {
        let loaded = load_history_file(path.as_ref())?;
        report.input += loaded.report.input;
        report.skipped += loaded.report.skipped;
        batches.push(loaded.records);
    }

    let records = merge_all(batches);
    report.kept = records.len();

    Ok(Normalized { records, report })
}
