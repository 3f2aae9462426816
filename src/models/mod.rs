//! Data models for the resource cache
//!
//! Serializable views of cache state and the demo's fetched records.

pub mod pokemon;
pub mod snapshot;

// Re-export commonly used types
pub use pokemon::Pokemon;
pub use snapshot::{CacheSnapshot, EntrySnapshot};
