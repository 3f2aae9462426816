//! Render Loop
//!
//! Reference scheduler for suspended resources: polls once per tick, shows a
//! fallback while pending and gives up after a deadline.

use std::fmt;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::resource::{AsyncResource, ResourcePoll};

/// Shortest polling cadence accepted; `tokio::time::interval` rejects zero.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

// == Render Outcome ==
/// How a render attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome<R> {
    /// The resource resolved and was rendered
    Rendered(R),
    /// The resource failed; holds the failure message for an error boundary
    Failed(String),
    /// The deadline passed while the resource was still pending
    TimedOut,
}

/// Polls `resource` every `poll_interval` until it settles or `timeout`
/// elapses, rendering the value with `render` once it is available.
///
/// Each tick is one render pass: a pending resource logs a fallback and the
/// loop retries on the next tick. The deadline belongs to this loop; the
/// resource's operation keeps running after a timeout.
pub async fn render_until_settled<T, E, R, F>(
    resource: &AsyncResource<T, E>,
    poll_interval: Duration,
    timeout: Duration,
    mut render: F,
) -> RenderOutcome<R>
where
    E: fmt::Display,
    F: FnMut(&T) -> R,
{
    let mut ticker = tokio::time::interval(poll_interval.max(MIN_POLL_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let passes = async {
        let mut pass: u32 = 0;
        loop {
            ticker.tick().await;
            pass += 1;

            match resource.poll() {
                ResourcePoll::Pending => {
                    debug!(pass, "Resource pending, rendering fallback");
                }
                ResourcePoll::Ready(value) => {
                    debug!(pass, "Resource ready");
                    return RenderOutcome::Rendered(render(value));
                }
                ResourcePoll::Failed(err) => {
                    warn!(pass, error = %err, "Resource failed, rendering error boundary");
                    return RenderOutcome::Failed(err.to_string());
                }
            }
        }
    };

    match tokio::time::timeout(timeout, passes).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "Render timed out while suspended");
            RenderOutcome::TimedOut
        }
    }
}
