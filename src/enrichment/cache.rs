//! In-memory cache of enriched tracks keyed by normalized artist and title.

use super::models::{EnrichedTrack, TrackQuery};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Enrichment results keyed by case-insensitive `artist:track`.
///
/// Entries are only ever inserted; the cache lives as long as its engine.
#[derive(Default)]
pub struct EnrichmentCache {
    entries: RwLock<HashMap<String, EnrichedTrack>>,
}

impl EnrichmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result for `query`, carrying the query's own play count.
    pub async fn get(&self, query: &TrackQuery) -> Option<EnrichedTrack> {
        let entries = self.entries.read().await;
        entries.get(&query.cache_key()).map(|cached| EnrichedTrack {
            artist: query.artist.clone(),
            track: query.track.clone(),
            play_count: query.count,
            ..cached.clone()
        })
    }

    pub async fn insert(&self, query: &TrackQuery, track: EnrichedTrack) {
        self.entries.write().await.insert(query.cache_key(), track);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::models::Provenance;

    #[tokio::test]
    async fn test_hit_is_case_insensitive_and_uses_query_count() {
        let cache = EnrichmentCache::new();
        let stored = TrackQuery::new("Björk", "Jóga", 3);
        let mut track = EnrichedTrack::unknown(&stored);
        track.provenance = Provenance::Remote;
        cache.insert(&stored, track).await;

        let hit = cache.get(&TrackQuery::new("BJÖRK", "jóga", 10)).await.unwrap();

        assert_eq!(hit.play_count, 10);
        assert_eq!(hit.artist, "BJÖRK");
        assert_eq!(hit.provenance, Provenance::Remote);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_miss() {
        let cache = EnrichmentCache::new();
        assert!(cache.is_empty().await);
        assert!(cache.get(&TrackQuery::new("A", "B", 1)).await.is_none());
    }
}
