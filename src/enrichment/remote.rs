//! Resolution through the remote metadata service.
//!
//! ## Pipeline per track
//!
//! ```text
//! external ref → track by id ─┐
//!   (or artist + title search) ├→ audio features by track id
//!                              └→ genres by artist id
//! ```
//!
//! Every API call first waits for the throttler, then gets `request_timeout`
//! to answer. Time spent queued behind other lookups does not count against
//! the timeout.

use super::models::{Provenance, ResolvedMetadata, TrackQuery, TrackRef};
use super::resolver::{ResolveError, Resolver};
use super::spotify_client::MetadataApi;
use super::throttle::RequestThrottler;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Most API calls one lookup makes: track by id, search, audio features and
/// artist.
pub const REMOTE_CALLS_PER_LOOKUP: u32 = 4;

pub struct RemoteResolver {
    api: Arc<dyn MetadataApi>,
    throttler: Arc<dyn RequestThrottler>,
    request_timeout: Duration,
}

impl RemoteResolver {
    pub fn new(api: Arc<dyn MetadataApi>, throttler: Arc<dyn RequestThrottler>) -> Self {
        Self {
            api,
            throttler,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    async fn throttled<T, F>(&self, call: F) -> Result<T, ResolveError>
    where
        F: Future<Output = Result<T, ResolveError>>,
    {
        self.throttler.acquire().await;
        tokio::time::timeout(self.request_timeout, call)
            .await
            .unwrap_or(Err(ResolveError::Timeout))
    }

    async fn find_track(&self, query: &TrackQuery) -> Result<TrackRef, ResolveError> {
        if let Some(track_id) = query.track_id() {
            match self.throttled(self.api.get_track(track_id)).await {
                Ok(Some(track)) => return Ok(track),
                Ok(None) => debug!("Track id {} not found, searching by name", track_id),
                Err(e) => debug!("Track id {} lookup failed ({}), searching by name", track_id, e),
            }
        }

        self.throttled(self.api.search_track(&query.artist, &query.track))
            .await?
            .ok_or_else(|| ResolveError::NotFound(format!("{} - {}", query.artist, query.track)))
    }
}

#[async_trait]
impl Resolver for RemoteResolver {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn resolve(&self, query: &TrackQuery) -> Result<ResolvedMetadata, ResolveError> {
        let track = self.find_track(query).await?;

        let audio_features = self
            .throttled(self.api.get_audio_features(&track.id))
            .await?
            .ok_or_else(|| ResolveError::NotFound(format!("audio features of {}", track.id)))?;

        let artist_id = track
            .artist_id
            .as_deref()
            .ok_or_else(|| ResolveError::Malformed(format!("track {} has no artist", track.id)))?;
        let genres = self
            .throttled(self.api.get_artist_genres(artist_id))
            .await?
            .ok_or_else(|| ResolveError::NotFound(format!("artist {}", artist_id)))?;

        debug!(
            "Resolved {} - {} as {} ({} genres)",
            query.artist,
            query.track,
            track.id,
            genres.len()
        );

        Ok(ResolvedMetadata {
            genres,
            audio_features: Some(audio_features),
            popularity: track.popularity,
            provenance: Provenance::Remote,
        })
    }
}
