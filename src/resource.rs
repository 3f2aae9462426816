//! Async Resource Module
//!
//! A synchronously-pollable handle around one eagerly-started asynchronous
//! operation. Rendering passes call [`AsyncResource::poll`] without ever
//! blocking; an outer scheduler awaits [`AsyncResource::settled`] to learn when
//! polling again is worthwhile.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tracing::debug;

use crate::error::ResourceError;

// == Resource State ==
/// Coarse lifecycle tag of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    /// The operation has not settled yet
    Pending,
    /// The operation completed with a value
    Resolved,
    /// The operation completed with a failure
    Rejected,
}

// == Resource Poll ==
/// Result of a single non-blocking poll.
#[derive(Debug)]
pub enum ResourcePoll<'a, T, E> {
    /// Not ready yet; the caller should retry on a later scheduling opportunity
    Pending,
    /// The operation's value
    Ready(&'a T),
    /// The operation's failure
    Failed(&'a ResourceError<E>),
}

impl<'a, T, E> ResourcePoll<'a, T, E> {
    pub fn is_pending(&self) -> bool {
        matches!(self, ResourcePoll::Pending)
    }

    pub fn ready(&self) -> Option<&'a T> {
        match self {
            ResourcePoll::Ready(value) => Some(*value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&'a ResourceError<E>> {
        match self {
            ResourcePoll::Failed(err) => Some(*err),
            _ => None,
        }
    }

    /// Converts a terminal poll into a `Result`, `None` while pending.
    pub fn into_result(self) -> Option<Result<&'a T, &'a ResourceError<E>>> {
        match self {
            ResourcePoll::Pending => None,
            ResourcePoll::Ready(value) => Some(Ok(value)),
            ResourcePoll::Failed(err) => Some(Err(err)),
        }
    }
}

// == Async Resource ==
struct Inner<T, E> {
    /// Written exactly once, when the operation settles
    outcome: OnceLock<Result<T, ResourceError<E>>>,
    /// Wakes schedulers waiting in `settled()`
    notify: Notify,
}

/// Handle to one asynchronous operation's eventual outcome.
///
/// Cloning is cheap and yields a handle to the same resource; use
/// [`AsyncResource::ptr_eq`] to compare identity.
pub struct AsyncResource<T, E> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for AsyncResource<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> fmt::Debug for AsyncResource<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncResource")
            .field("state", &self.state())
            .finish()
    }
}

impl<T, E> AsyncResource<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    // == Spawn ==
    /// Starts `operation` on `runtime` immediately and returns its handle.
    ///
    /// The operation runs whether or not anyone polls. If its task panics or
    /// is cancelled, the resource settles as [`ResourceError::Aborted`].
    pub fn spawn<Fut>(runtime: &Handle, operation: Fut) -> Self
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let resource = Self::pending();
        let settle = resource.clone();
        let task = runtime.spawn(operation);

        runtime.spawn(async move {
            let outcome = match task.await {
                Ok(result) => result.map_err(ResourceError::Operation),
                Err(join_err) => Err(ResourceError::Aborted(join_err.to_string())),
            };
            settle.settle(outcome);
            debug!(state = ?settle.state(), "Resource settled");
        });

        resource
    }
}

impl<T, E> AsyncResource<T, E> {
    fn pending() -> Self {
        Self {
            inner: Arc::new(Inner {
                outcome: OnceLock::new(),
                notify: Notify::new(),
            }),
        }
    }

    /// Creates a resource that is already resolved with `value`.
    pub fn resolved(value: T) -> Self {
        let resource = Self::pending();
        resource.settle(Ok(value));
        resource
    }

    /// Creates a resource that is already rejected with `err`.
    pub fn rejected(err: E) -> Self {
        let resource = Self::pending();
        resource.settle(Err(ResourceError::Operation(err)));
        resource
    }

    /// Records the terminal outcome. Later calls are ignored.
    fn settle(&self, outcome: Result<T, ResourceError<E>>) {
        let _ = self.inner.outcome.set(outcome);
        self.inner.notify.notify_waiters();
    }

    // == Poll ==
    /// Non-blocking read of the current state.
    ///
    /// Never starts or restarts the operation. Once terminal, every call
    /// returns a reference to the same stored value or failure.
    pub fn poll(&self) -> ResourcePoll<'_, T, E> {
        match self.inner.outcome.get() {
            None => ResourcePoll::Pending,
            Some(Ok(value)) => ResourcePoll::Ready(value),
            Some(Err(err)) => ResourcePoll::Failed(err),
        }
    }

    pub fn state(&self) -> ResourceState {
        match self.inner.outcome.get() {
            None => ResourceState::Pending,
            Some(Ok(_)) => ResourceState::Resolved,
            Some(Err(_)) => ResourceState::Rejected,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.inner.outcome.get().is_some()
    }

    // == Settled ==
    /// Completes once the resource has reached a terminal state.
    pub async fn settled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a settlement in between is not missed
            notified.as_mut().enable();

            if self.is_settled() {
                return;
            }
            notified.await;
        }
    }

    /// Returns true if both handles refer to the same resource.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test(start_paused = true)]
    async fn test_pending_until_operation_settles() {
        let (tx, rx) = oneshot::channel::<u32>();
        let resource: AsyncResource<u32, String> = AsyncResource::spawn(&Handle::current(), async move {
            rx.await.map_err(|e| e.to_string())
        });

        for _ in 0..5 {
            assert!(resource.poll().is_pending());
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(resource.state(), ResourceState::Pending);

        tx.send(25).unwrap();
        resource.settled().await;

        assert_eq!(resource.state(), ResourceState::Resolved);
        assert_eq!(resource.poll().ready(), Some(&25));
    }

    #[tokio::test(start_paused = true)]
    async fn test_operation_starts_without_poll() {
        let started = Arc::new(AtomicBool::new(false));
        let flag = started.clone();
        let (_tx, rx) = oneshot::channel::<()>();

        let resource: AsyncResource<(), String> = AsyncResource::spawn(&Handle::current(), async move {
            flag.store(true, Ordering::SeqCst);
            rx.await.map_err(|e| e.to_string())
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(started.load(Ordering::SeqCst));
        assert!(!resource.is_settled());
    }

    #[test]
    fn test_resolved_poll_is_idempotent() {
        let resource: AsyncResource<String, String> = AsyncResource::resolved("pikachu".to_string());

        let first = resource.poll().ready().unwrap();
        for _ in 0..10 {
            let again = resource.poll().ready().unwrap();
            assert!(std::ptr::eq(first, again));
            assert_eq!(again, "pikachu");
        }
    }

    #[test]
    fn test_rejected_poll_surfaces_same_failure() {
        let resource: AsyncResource<String, String> = AsyncResource::rejected("NotFound".to_string());

        let first = resource.poll().failure().unwrap();
        for _ in 0..10 {
            let again = resource.poll().failure().unwrap();
            assert!(std::ptr::eq(first, again));
            assert_eq!(again, &ResourceError::Operation("NotFound".to_string()));
        }
        assert_eq!(resource.state(), ResourceState::Rejected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_operation_failure_is_propagated() {
        let resource: AsyncResource<u32, String> = AsyncResource::spawn(&Handle::current(), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Err("NotFound".to_string())
        });

        resource.settled().await;
        let err = resource.poll().failure().unwrap();
        assert_eq!(err.operation().map(String::as_str), Some("NotFound"));
    }

    #[tokio::test]
    async fn test_panicking_operation_settles_as_aborted() {
        let resource: AsyncResource<u32, String> = AsyncResource::spawn(&Handle::current(), async {
            if true {
                panic!("boom");
            }
            Ok(0)
        });

        resource.settled().await;
        assert!(matches!(
            resource.poll().failure(),
            Some(ResourceError::Aborted(_))
        ));
    }

    #[tokio::test]
    async fn test_settled_returns_immediately_when_terminal() {
        let resource: AsyncResource<u32, String> = AsyncResource::resolved(1);
        resource.settled().await;
        assert!(resource.is_settled());
    }

    #[test]
    fn test_clone_shares_identity() {
        let a: AsyncResource<u32, String> = AsyncResource::resolved(1);
        let b = a.clone();
        let c: AsyncResource<u32, String> = AsyncResource::resolved(1);

        assert!(AsyncResource::ptr_eq(&a, &b));
        assert!(!AsyncResource::ptr_eq(&a, &c));
    }

    #[test]
    fn test_into_result() {
        let ok: AsyncResource<u32, String> = AsyncResource::resolved(7);
        assert_eq!(ok.poll().into_result(), Some(Ok(&7)));

        let err: AsyncResource<u32, String> = AsyncResource::rejected("x".to_string());
        assert!(matches!(err.poll().into_result(), Some(Err(_))));
    }
}
