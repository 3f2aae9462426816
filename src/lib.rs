//! Suspense Cache - keyed cache of synchronously-pollable async resources
//!
//! Starts asynchronous work eagerly, lets rendering passes poll it without
//! blocking, and deduplicates work by case-insensitive key with TTL expiry.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod resource;
pub mod tasks;

pub use cache::ResourceCache;
pub use config::Config;
pub use error::{CacheError, ResourceError};
pub use resource::{AsyncResource, ResourcePoll, ResourceState};
pub use tasks::{render_until_settled, RenderOutcome};
