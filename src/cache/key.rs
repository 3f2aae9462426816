//! Cache Key Module
//!
//! Keys are case-insensitive: "Pikachu" and "pikachu" address the same entry.

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{CacheError, Result};

/// Validates `key` and returns its normalized (lowercased) form.
pub fn normalize_key(key: &str) -> Result<String> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
    }

    // Lowercasing can grow a key, so the limit applies to the stored form
    let normalized = key.to_lowercase();
    if normalized.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }

    Ok(normalized)
}
