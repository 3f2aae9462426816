//! Error types for the resource cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors returned to the immediate caller of the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is empty or exceeds the maximum length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// TTL must be a positive duration
    #[error("Invalid TTL: must be greater than zero")]
    InvalidTtl,

    /// No tokio runtime available to drive operations and expiry timers
    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),
}

// == Resource Error Enum ==
/// Terminal failure of an [`AsyncResource`](crate::resource::AsyncResource).
///
/// Once a resource settles with one of these, every subsequent poll surfaces
/// the very same value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError<E> {
    /// The underlying operation completed with a failure
    #[error("{0}")]
    Operation(E),

    /// The operation's task panicked or was cancelled before settling
    #[error("Operation aborted: {0}")]
    Aborted(String),
}

impl<E> ResourceError<E> {
    /// Returns the operation's own failure, if that is what this is.
    pub fn operation(&self) -> Option<&E> {
        match self {
            ResourceError::Operation(err) => Some(err),
            ResourceError::Aborted(_) => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_error_displays_verbatim() {
        let err: ResourceError<String> = ResourceError::Operation("NotFound".to_string());
        assert_eq!(err.to_string(), "NotFound");
        assert_eq!(err.operation().map(String::as_str), Some("NotFound"));
    }

    #[test]
    fn test_aborted_has_no_operation_error() {
        let err: ResourceError<String> = ResourceError::Aborted("task panicked".to_string());
        assert!(err.operation().is_none());
        assert!(err.to_string().contains("task panicked"));
    }

    #[test]
    fn test_cache_error_converts_into_anyhow() {
        let err: anyhow::Error = CacheError::InvalidTtl.into();
        assert!(err.to_string().contains("TTL"));
    }
}
