//! Deduplicating merge of history imports.
//!
//! Two plays are the same play when timestamp, track name and duration all
//! match exactly. Each such key is kept at most once.

use super::models::NormalizedRecord;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

type PlayKey<'a> = (DateTime<Utc>, &'a str, u64);

fn play_key(record: &NormalizedRecord) -> PlayKey<'_> {
    (record.timestamp, record.track_name.as_str(), record.ms_played)
}

/// Merge `incoming` into `existing`, dropping duplicate plays.
///
/// The result is sorted ascending by timestamp. Sorting is stable, so plays
/// sharing a timestamp keep their input order.
pub fn merge(existing: &[NormalizedRecord], incoming: &[NormalizedRecord]) -> Vec<NormalizedRecord> {
    let mut seen: HashSet<PlayKey<'_>> = HashSet::with_capacity(existing.len() + incoming.len());
    let mut merged: Vec<NormalizedRecord> = existing
        .iter()
        .chain(incoming.iter())
        .filter(|record| seen.insert(play_key(*record)))
        .cloned()
        .collect();

    merged.sort_by_key(|record| record.timestamp);
    merged
}

/// Fold any number of imports into a single deduplicated history.
pub fn merge_all<I>(batches: I) -> Vec<NormalizedRecord>
where
    I: IntoIterator<Item = Vec<NormalizedRecord>>,
{
    batches
        .into_iter()
        .fold(Vec::new(), |acc, batch| merge(&acc, &batch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_record(hour: u32, track: &str, ms: u64) -> NormalizedRecord {
        NormalizedRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 10, hour, 0, 0).unwrap(),
            ms_played: ms,
            track_name: track.to_string(),
            artist_name: "Artist".to_string(),
            album_name: None,
            platform: None,
            track_uri: None,
            skipped: false,
            shuffle: false,
            offline: false,
        }
    }

    #[test]
    fn test_merge_with_empty_incoming_sorts_existing() {
        let existing = vec![
            make_record(10, "B", 60_000),
            make_record(8, "A", 60_000),
        ];

        let merged = merge(&existing, &[]);

        let mut expected = existing.clone();
        expected.sort_by_key(|r| r.timestamp);
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_merge_with_itself_is_stable() {
        let a = vec![
            make_record(8, "A", 60_000),
            make_record(9, "B", 60_000),
            make_record(10, "C", 60_000),
        ];

        let once = merge(&a, &[]);
        let twice = merge(&once, &once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_counts_shared_triples_once() {
        let a = vec![
            make_record(8, "A", 60_000),
            make_record(9, "B", 60_000),
            make_record(10, "C", 60_000),
        ];
        let b = vec![
            make_record(9, "B", 60_000),
            make_record(10, "C", 60_000),
            make_record(11, "D", 60_000),
            make_record(12, "E", 60_000),
        ];

        let merged = merge(&a, &b);

        assert_eq!(merged.len(), a.len() + b.len() - 2);
        let tracks: Vec<&str> = merged.iter().map(|r| r.track_name.as_str()).collect();
        assert_eq!(tracks, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_merge_distinguishes_by_duration_and_track() {
        let a = vec![make_record(8, "A", 60_000)];
        let b = vec![make_record(8, "A", 61_000), make_record(8, "Z", 60_000)];

        let merged = merge(&a, &b);

        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_merge_with_empty_existing_dedups_incoming() {
        let incoming = vec![
            make_record(9, "B", 60_000),
            make_record(9, "B", 60_000),
            make_record(8, "A", 60_000),
        ];

        let merged = merge(&[], &incoming);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].track_name, "A");
    }

    #[test]
    fn test_merge_all_folds_batches() {
        let batches = vec![
            vec![make_record(8, "A", 60_000)],
            vec![make_record(8, "A", 60_000), make_record(9, "B", 60_000)],
            vec![],
        ];

        let merged = merge_all(batches);

        assert_eq!(merged.len(), 2);
    }
}
