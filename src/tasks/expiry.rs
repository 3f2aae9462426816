//! TTL Expiry Task
//!
//! One-shot timer armed for every new cache entry.

use std::sync::{Mutex, Weak};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::{lock_state, CacheState};

/// Spawns a timer that removes the entry for `key` at `deadline`.
///
/// The deadline is the entry's own `expires_at`, so the timer fires on time
/// however late the task is first polled.
///
/// The timer captures the entry's `generation` and only removes the entry if
/// it is still the same one; a newer entry created under the same key is left
/// alone. It holds the cache state weakly, so a dropped cache is not kept
/// alive by its pending timers.
///
/// # Returns
/// A JoinHandle whose abort handle the entry keeps, cancelling the timer when
/// the entry is removed by other means.
pub(crate) fn spawn_expiry_timer<T, E>(
    runtime: &Handle,
    state: Weak<Mutex<CacheState<T, E>>>,
    key: String,
    generation: u64,
    deadline: Instant,
) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    runtime.spawn(async move {
        tokio::time::sleep_until(deadline).await;

        let Some(state) = state.upgrade() else {
            debug!(key = %key, "Cache dropped before expiry");
            return;
        };

        let expired = lock_state(&state).expire(&key, generation);
        if expired {
            info!(key = %key, generation, "Resource expired");
        } else {
            debug!(key = %key, generation, "Stale expiry timer ignored");
        }
    })
}
