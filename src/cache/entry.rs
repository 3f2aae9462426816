//! Cache Entry Module
//!
//! Defines a single cached resource together with its expiry bookkeeping.

use chrono::{DateTime, Utc};
use tokio::task::AbortHandle;
use tokio::time::{Duration, Instant};

use crate::resource::AsyncResource;

// == Cache Entry ==
/// One live resource in the cache.
///
/// Dropping the entry cancels its expiry timer, so removal by any path
/// (expiry, invalidation, clear, cache drop) leaves no timer behind.
#[derive(Debug)]
pub(crate) struct CacheEntry<T, E> {
    /// The cached resource
    pub(crate) resource: AsyncResource<T, E>,
    /// Stamp distinguishing this entry from later ones under the same key
    pub(crate) generation: u64,
    /// Wall-clock creation time, for snapshots
    pub(crate) created_at: DateTime<Utc>,
    /// Monotonic deadline after which the entry is dead
    pub(crate) expires_at: Instant,
    /// TTL the entry was created with
    pub(crate) ttl: Duration,
    /// Handle to the armed expiry timer
    expiry: Option<AbortHandle>,
}

impl<T, E> CacheEntry<T, E> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    pub(crate) fn new(resource: AsyncResource<T, E>, generation: u64, ttl: Duration) -> Self {
        Self {
            resource,
            generation,
            created_at: Utc::now(),
            expires_at: Instant::now() + ttl,
            ttl,
            expiry: None,
        }
    }

    /// Attaches the expiry timer so it is cancelled together with the entry.
    pub(crate) fn arm(&mut self, timer: AbortHandle) {
        if let Some(previous) = self.expiry.replace(timer) {
            previous.abort();
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its deadline.
    pub(crate) fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Remaining lifetime, zero once expired.
    pub(crate) fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

impl<T, E> Drop for CacheEntry<T, E> {
    fn drop(&mut self) {
        if let Some(timer) = self.expiry.take() {
            timer.abort();
        }
    }
}
