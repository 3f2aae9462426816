//! Cache Module
//!
//! Keyed cache of eagerly-started async resources with per-entry TTL expiry.

mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub(crate) use entry::CacheEntry;
pub use key::normalize_key;
pub use stats::CacheStats;
pub use store::ResourceCache;

pub(crate) use store::{lock_state, CacheState};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// TTL applied when a caller does not pass one
pub const DEFAULT_TTL_MS: u64 = 60_000;
