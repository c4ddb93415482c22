//! Request throttling for the metadata service.
//!
//! Outbound calls are serialized and spaced by a minimum interval to stay
//! within the service's request budget.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Trait for outbound request throttling.
#[async_trait]
pub trait RequestThrottler: Send + Sync {
    /// Wait until the next request is allowed, then claim the slot.
    async fn acquire(&self);
}

/// Throttler enforcing a minimum delay between consecutive requests.
///
/// The lock is held while sleeping, so concurrent callers queue up and are
/// released one interval apart.
pub struct MinIntervalThrottler {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl MinIntervalThrottler {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }
}

#[async_trait]
impl RequestThrottler for MinIntervalThrottler {
    async fn acquire(&self) {
        let mut last_request = self.last_request.lock().await;

        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        *last_request = Some(Instant::now());
    }
}

/// No-op throttler that always allows requests.
/// Used when the minimum interval is zero.
pub struct NoOpThrottler;

#[async_trait]
impl RequestThrottler for NoOpThrottler {
    async fn acquire(&self) {}
}
