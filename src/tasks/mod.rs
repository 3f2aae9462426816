//! Background Tasks Module
//!
//! Tasks that run alongside the cache on the tokio runtime.
//!
//! # Tasks
//! - Expiry timer: removes one cache entry once its TTL has elapsed
//! - Render loop: polls a resource until it settles or a deadline passes

mod expiry;
mod render;

pub(crate) use expiry::spawn_expiry_timer;
pub use render::{render_until_settled, RenderOutcome};
