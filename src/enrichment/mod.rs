//! Genre, audio-feature and likability enrichment for the most played tracks.
//!
//! A [`Resolver`] answers for a single track. The remote one talks to the
//! Spotify Web API through a throttled [`SpotifyClient`]; the deterministic
//! one derives stable pseudo-random metadata from the track name. The
//! [`EnrichmentEngine`] drives a resolver over a list of tracks with caching,
//! batching, timeouts and cancellation.

mod cache;
mod engine;
mod likability;
mod models;
mod remote;
mod resolver;
mod selection;
mod spotify_client;
mod summary;
mod synthetic;
mod throttle;

pub use cache::EnrichmentCache;
pub use engine::EnrichmentEngine;
pub use likability::likability_score;
pub use models::{
    AudioFeatures, EnrichedTrack, Provenance, ResolvedMetadata, TrackQuery, TrackRef,
    UNKNOWN_GENRE,
};
pub use remote::{RemoteResolver, DEFAULT_REQUEST_TIMEOUT, REMOTE_CALLS_PER_LOOKUP};
pub use resolver::{FallbackResolver, ResolveError, Resolver};
pub use selection::{select_top_tracks, DEFAULT_TOP_TRACKS};
pub use spotify_client::{MetadataApi, SpotifyClient, SPOTIFY_API_BASE};
pub use summary::EnrichmentSummary;
pub use synthetic::{generate_metadata, string_hash, DeterministicFallbackResolver};
pub use throttle::{MinIntervalThrottler, NoOpThrottler, RequestThrottler};

use crate::config::EnrichmentSettings;
use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::info;

/// Build the resolver chain the settings ask for.
///
/// With an access token, lookups go to the remote service, falling back to
/// generated metadata unless the fallback is disabled. Without one, only the
/// generated metadata is available.
pub fn build_resolver(settings: &EnrichmentSettings) -> Result<Arc<dyn Resolver>> {
    let remote: Option<Arc<dyn Resolver>> = match settings.access_token.as_deref() {
        Some(token) => {
            let client =
                SpotifyClient::new(&settings.api_base_url, token, settings.request_timeout())?;
            let throttler: Arc<dyn RequestThrottler> = if settings.min_request_interval().is_zero() {
                Arc::new(NoOpThrottler)
            } else {
                Arc::new(MinIntervalThrottler::new(settings.min_request_interval()))
            };
            Some(Arc::new(
                RemoteResolver::new(Arc::new(client), throttler)
                    .with_request_timeout(settings.request_timeout()),
            ))
        }
        None => None,
    };

    let resolver: Arc<dyn Resolver> = match (remote, settings.fallback_enabled) {
        (Some(remote), true) => {
            info!(
                "Enriching from {} with generated fallback",
                settings.api_base_url
            );
            Arc::new(FallbackResolver::new(
                remote,
                Arc::new(DeterministicFallbackResolver),
            ))
        }
        (Some(remote), false) => {
            info!("Enriching from {} without fallback", settings.api_base_url);
            remote
        }
        (None, true) => {
            info!("No access token configured, using generated metadata only");
            Arc::new(DeterministicFallbackResolver)
        }
        (None, false) => {
            bail!("Enrichment needs an access token when the fallback is disabled")
        }
    };

    Ok(resolver)
}
