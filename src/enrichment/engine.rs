//! Batched, bounded, cancellable enrichment of a list of tracks.
//!
//! Tracks are processed in fixed-size batches. Lookups inside a batch run
//! concurrently, limited by a semaphore, and the batch is joined before the
//! next one starts so results come back in input order. A short pause
//! separates batches.
//!
//! A track whose lookup fails, overruns the lookup deadline or is cancelled
//! is still reported, as an `unknown` entry, so the output always has one
//! entry per input. Per-call timeouts belong to the resolver; the deadline
//! here only catches a lookup that never settles.

use super::cache::EnrichmentCache;
use super::models::{EnrichedTrack, Provenance, TrackQuery};
use super::resolver::{ResolveError, Resolver};
use crate::config::EnrichmentSettings;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct EnrichmentEngine {
    resolver: Arc<dyn Resolver>,
    cache: EnrichmentCache,
    permits: Semaphore,
    batch_size: usize,
    batch_pause: Duration,
    lookup_deadline: Duration,
}

impl EnrichmentEngine {
    pub fn new(resolver: Arc<dyn Resolver>, settings: &EnrichmentSettings) -> Self {
        Self {
            resolver,
            cache: EnrichmentCache::new(),
            permits: Semaphore::new(settings.max_concurrency.max(1)),
            batch_size: settings.batch_size.max(1),
            batch_pause: settings.batch_pause(),
            lookup_deadline: settings.lookup_deadline(),
        }
    }

    /// Override the deadline of a whole lookup.
    pub fn with_lookup_deadline(mut self, deadline: Duration) -> Self {
        self.lookup_deadline = deadline;
        self
    }

    pub fn cache(&self) -> &EnrichmentCache {
        &self.cache
    }

    pub async fn enrich(&self, tracks: &[TrackQuery]) -> Vec<EnrichedTrack> {
        self.enrich_with_cancel(tracks, &CancellationToken::new()).await
    }

    /// Enrich `tracks`, giving up on outstanding lookups once `cancel` fires.
    pub async fn enrich_with_cancel(
        &self,
        tracks: &[TrackQuery],
        cancel: &CancellationToken,
    ) -> Vec<EnrichedTrack> {
        info!(
            "Enriching {} tracks via {} (batch size {})",
            tracks.len(),
            self.resolver.name(),
            self.batch_size
        );

        let batch_count = tracks.len().div_ceil(self.batch_size);
        let mut enriched = Vec::with_capacity(tracks.len());

        for (i, batch) in tracks.chunks(self.batch_size).enumerate() {
            if i > 0 && !self.batch_pause.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(self.batch_pause) => {}
                    _ = cancel.cancelled() => {}
                }
            }

            let results = join_all(batch.iter().map(|query| self.enrich_one(query, cancel))).await;
            enriched.extend(results);
            debug!("Batch {}/{} done", i + 1, batch_count);
        }

        let unknown = enriched
            .iter()
            .filter(|t| t.provenance == Provenance::Unknown)
            .count();
        if cancel.is_cancelled() {
            warn!(
                "Enrichment cancelled, {} of {} tracks left unknown",
                unknown,
                enriched.len()
            );
        } else {
            info!(
                "Enriched {} tracks ({} unknown, {} cached)",
                enriched.len(),
                unknown,
                self.cache.len().await
            );
        }

        enriched
    }

    async fn enrich_one(&self, query: &TrackQuery, cancel: &CancellationToken) -> EnrichedTrack {
        if let Some(hit) = self.cache.get(query).await {
            debug!("Cache hit for {} - {}", query.artist, query.track);
            return hit;
        }
        if cancel.is_cancelled() {
            return EnrichedTrack::unknown(query);
        }

        let _permit = tokio::select! {
            permit = self.permits.acquire() => match permit {
                Ok(permit) => permit,
                Err(_) => return EnrichedTrack::unknown(query),
            },
            _ = cancel.cancelled() => return EnrichedTrack::unknown(query),
        };

        let outcome = tokio::select! {
            result = tokio::time::timeout(self.lookup_deadline, self.resolver.resolve(query)) => {
                result.unwrap_or(Err(ResolveError::Timeout))
            }
            _ = cancel.cancelled() => Err(ResolveError::Cancelled),
        };

        match outcome {
            Ok(resolved) => {
                let track = EnrichedTrack::from_resolved(query, resolved);
                self.cache.insert(query, track.clone()).await;
                track
            }
            Err(ResolveError::Cancelled) => {
                debug!("Lookup of {} - {} cancelled", query.artist, query.track);
                EnrichedTrack::unknown(query)
            }
            Err(e) => {
                warn!(
                    "Could not enrich {} - {}: {}",
                    query.artist, query.track, e
                );
                EnrichedTrack::unknown(query)
            }
        }
    }
}
