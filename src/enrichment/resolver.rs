//! The `Resolver` seam and its composition policy.

use super::models::{ResolvedMetadata, TrackQuery};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from a single track resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Metadata service returned status {0}")]
    Status(u16),

    #[error("Metadata service rate limited the request")]
    RateLimited,

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Resolution timed out")]
    Timeout,

    #[error("Resolution cancelled")]
    Cancelled,
}

/// Resolves genre and audio-feature metadata for one track.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn resolve(&self, query: &TrackQuery) -> Result<ResolvedMetadata, ResolveError>;
}

/// Tries `primary`, and on any error answers with `fallback` instead.
pub struct FallbackResolver {
    primary: Arc<dyn Resolver>,
    fallback: Arc<dyn Resolver>,
}

impl FallbackResolver {
    pub fn new(primary: Arc<dyn Resolver>, fallback: Arc<dyn Resolver>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl Resolver for FallbackResolver {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn resolve(&self, query: &TrackQuery) -> Result<ResolvedMetadata, ResolveError> {
        match self.primary.resolve(query).await {
            Ok(resolved) => Ok(resolved),
            Err(ResolveError::Cancelled) => Err(ResolveError::Cancelled),
            Err(e) => {
                warn!(
                    "{} lookup failed for {} - {}: {}, using {}",
                    self.primary.name(),
                    query.artist,
                    query.track,
                    e,
                    self.fallback.name()
                );
                let resolved = self.fallback.resolve(query).await?;
                debug!("Resolved {} - {} via {}", query.artist, query.track, self.fallback.name());
                Ok(resolved)
            }
        }
    }
}
