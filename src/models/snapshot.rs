//! Cache snapshot DTOs
//!
//! Point-in-time, serializable views of the cache for debugging output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats};
use crate::resource::ResourceState;

/// One cache entry as seen at snapshot time.
#[derive(Debug, Clone, Serialize)]
pub struct EntrySnapshot {
    /// Normalized cache key
    pub key: String,
    /// Lifecycle state of the entry's resource
    pub state: ResourceState,
    /// Entry generation stamp
    pub generation: u64,
    /// Creation time (RFC 3339 when serialized)
    pub created_at: DateTime<Utc>,
    /// TTL the entry was created with, in milliseconds
    pub ttl_ms: u64,
    /// Time left before expiry, in milliseconds
    pub ttl_remaining_ms: u64,
}

impl EntrySnapshot {
    pub(crate) fn from_entry<T, E>(key: &str, entry: &CacheEntry<T, E>) -> Self {
        Self {
            key: key.to_string(),
            state: entry.resource.state(),
            generation: entry.generation,
            created_at: entry.created_at,
            ttl_ms: entry.ttl.as_millis() as u64,
            ttl_remaining_ms: entry.ttl_remaining().as_millis() as u64,
        }
    }
}

/// Every entry plus the counters, as returned by `ResourceCache::snapshot`.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    pub entries: Vec<EntrySnapshot>,
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl CacheSnapshot {
    pub fn new(entries: Vec<EntrySnapshot>, stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            entries,
            stats,
            hit_rate,
        }
    }
}
