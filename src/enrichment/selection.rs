//! Picking which tracks to enrich.

use super::models::TrackQuery;
use crate::history::NormalizedRecord;
use std::collections::HashMap;

/// Default number of tracks handed to the enrichment engine.
pub const DEFAULT_TOP_TRACKS: usize = 100;

/// Group plays by artist and track, case-insensitively, and return the
/// `limit` most played as queries.
///
/// The first spelling seen for a track is the one kept for display, along
/// with the first track reference found among its plays. Ties keep first-seen
/// order.
pub fn select_top_tracks(records: &[NormalizedRecord], limit: usize) -> Vec<TrackQuery> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut queries: Vec<TrackQuery> = Vec::new();

    for record in records {
        let query = TrackQuery::new(record.artist_name.as_str(), record.track_name.as_str(), 1);
        let key = query.cache_key();
        match index.get(&key) {
            Some(&pos) => {
                let existing = &mut queries[pos];
                existing.count += 1;
                if existing.external_ref.is_none() {
                    existing.external_ref = record.track_uri.clone();
                }
            }
            None => {
                index.insert(key, queries.len());
                queries.push(TrackQuery {
                    external_ref: record.track_uri.clone(),
                    ..query
                });
            }
        }
    }

    queries.sort_by(|a, b| b.count.cmp(&a.count));
    queries.truncate(limit);
    queries
}
