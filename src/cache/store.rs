//! Resource Cache Module
//!
//! Main cache engine: maps normalized keys to async resources, invokes the
//! producer factory once per miss and expires entries after their TTL.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::time::Duration;
use tracing::{debug, info};

use crate::cache::{normalize_key, CacheEntry, CacheStats};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{CacheSnapshot, EntrySnapshot};
use crate::resource::AsyncResource;
use crate::tasks::spawn_expiry_timer;

// == Cache State ==
/// Mutable state shared between the cache and its expiry timers.
#[derive(Debug)]
pub(crate) struct CacheState<T, E> {
    entries: HashMap<String, CacheEntry<T, E>>,
    stats: CacheStats,
    next_generation: u64,
}

impl<T, E> CacheState<T, E> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            next_generation: 0,
        }
    }

    /// Returns the live resource for `key`, dropping a dead entry whose timer
    /// has not run yet.
    fn lookup(&mut self, key: &str) -> Option<AsyncResource<T, E>> {
        if self.entries.get(key)?.is_expired() {
            self.entries.remove(key);
            self.stats.record_expiration();
            self.stats.set_total_entries(self.entries.len());
            debug!(key = %key, "Removed expired entry on lookup");
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).map(|entry| entry.resource.clone())
    }

    fn next_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    fn insert(&mut self, key: String, entry: CacheEntry<T, E>) {
        self.entries.insert(key, entry);
        self.stats.record_miss();
        self.stats.set_total_entries(self.entries.len());
    }

    // == Expire ==
    /// Removes the entry for `key` only if it is still the one stamped with
    /// `generation`. A timer outliving its entry must not evict a newer one.
    pub(crate) fn expire(&mut self, key: &str, generation: u64) -> bool {
        let matches = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.generation == generation);

        if matches {
            self.entries.remove(key);
            self.stats.record_expiration();
            self.stats.set_total_entries(self.entries.len());
        }
        matches
    }

    fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.record_invalidations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.record_invalidations(count);
        self.stats.set_total_entries(0);
        count
    }
}

/// Locks the shared state, recovering it if a panic (for instance in a
/// cached value's destructor) poisoned the lock.
pub(crate) fn lock_state<T, E>(state: &Mutex<CacheState<T, E>>) -> MutexGuard<'_, CacheState<T, E>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// == Resource Cache ==
/// Cache of async resources keyed by case-insensitive name.
///
/// For any key, at most one live resource exists: every request made before
/// the entry expires receives the same handle and the producer factory runs
/// only once. Dropping the cache cancels all pending expiry timers; in-flight
/// operations are left to finish on their own.
#[derive(Debug)]
pub struct ResourceCache<T, E> {
    /// Entry map, shared weakly with expiry timers
    state: Arc<Mutex<CacheState<T, E>>>,
    /// Runtime that drives operations and timers
    runtime: Handle,
    /// TTL used by `get` and `try_get`
    default_ttl: Duration,
}

impl<T, E> ResourceCache<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache whose operations and timers run on `runtime`.
    pub fn new(runtime: Handle, default_ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::new())),
            runtime,
            default_ttl,
        }
    }

    /// Creates a cache using the configured default TTL.
    pub fn from_config(config: &Config, runtime: Handle) -> Self {
        Self::new(runtime, config.default_ttl())
    }

    /// Creates a cache on the tokio runtime the caller is running in.
    pub fn current(default_ttl: Duration) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| CacheError::NoRuntime(e.to_string()))?;
        Ok(Self::new(runtime, default_ttl))
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Get ==
    /// Returns the resource for `key`, starting `factory`'s operation on a miss.
    pub fn get<F, Fut>(&self, key: &str, factory: F) -> Result<AsyncResource<T, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    {
        self.get_with_ttl(key, self.default_ttl, factory)
    }

    /// Like [`get`](Self::get), with an explicit TTL for a newly created entry.
    ///
    /// The TTL of an existing entry is never changed by later requests.
    pub fn get_with_ttl<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        factory: F,
    ) -> Result<AsyncResource<T, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    {
        self.try_get_with_ttl(key, ttl, || Ok::<_, CacheError>(factory()))
    }

    /// Like [`get`](Self::get), for factories that can fail before producing
    /// an operation.
    pub fn try_get<F, Fut, X>(&self, key: &str, factory: F) -> std::result::Result<AsyncResource<T, E>, X>
    where
        F: FnOnce() -> std::result::Result<Fut, X>,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        X: From<CacheError>,
    {
        self.try_get_with_ttl(key, self.default_ttl, factory)
    }

    /// Core lookup-or-create.
    ///
    /// A factory failure is returned unchanged and nothing is cached. The
    /// factory runs without the cache lock held and may itself request other
    /// keys. If an entry for `key` appears meanwhile, that entry wins and the
    /// factory's future is dropped unstarted, so only one operation ever runs
    /// per live key.
    pub fn try_get_with_ttl<F, Fut, X>(
        &self,
        key: &str,
        ttl: Duration,
        factory: F,
    ) -> std::result::Result<AsyncResource<T, E>, X>
    where
        F: FnOnce() -> std::result::Result<Fut, X>,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        X: From<CacheError>,
    {
        let key = normalize_key(key)?;
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl.into());
        }

        if let Some(resource) = lock_state(&self.state).lookup(&key) {
            debug!(key = %key, "Resource cache hit");
            return Ok(resource);
        }

        // Outside the lock, so the factory may call back into this cache.
        // The future is lazy: nothing runs until it is spawned below.
        let operation = factory()?;

        let mut state = lock_state(&self.state);
        if let Some(resource) = state.lookup(&key) {
            debug!(key = %key, "Entry created while the factory ran, discarding operation");
            return Ok(resource);
        }

        let resource = AsyncResource::spawn(&self.runtime, operation);
        let generation = state.next_generation();

        let mut entry = CacheEntry::new(resource.clone(), generation, ttl);
        let timer = spawn_expiry_timer(
            &self.runtime,
            Arc::downgrade(&self.state),
            key.clone(),
            generation,
            entry.expires_at,
        );
        entry.arm(timer.abort_handle());

        info!(
            key = %key,
            generation,
            ttl_ms = ttl.as_millis() as u64,
            "Resource cache miss, operation started"
        );
        state.insert(key, entry);

        Ok(resource)
    }

    // == Invalidate ==
    /// Removes the entry for `key` so the next request starts a fresh operation.
    ///
    /// Returns false if there was no entry. The abandoned operation keeps
    /// running and settles into the detached resource.
    pub fn invalidate(&self, key: &str) -> bool {
        let Ok(key) = normalize_key(key) else {
            return false;
        };

        let removed = lock_state(&self.state).remove(&key);
        if removed {
            info!(key = %key, "Resource invalidated");
        }
        removed
    }

    /// Removes every entry. Returns the number removed.
    pub fn clear(&self) -> usize {
        let count = lock_state(&self.state).clear();
        info!(count, "Resource cache cleared");
        count
    }

    /// Returns true if a live entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        let Ok(key) = normalize_key(key) else {
            return false;
        };

        lock_state(&self.state)
            .entries
            .get(&key)
            .is_some_and(|entry| !entry.is_expired())
    }

    pub fn len(&self) -> usize {
        lock_state(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        lock_state(&self.state).entries.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        lock_state(&self.state).stats.clone()
    }

    // == Snapshot ==
    /// Point-in-time view of every entry, sorted by key.
    pub fn snapshot(&self) -> CacheSnapshot {
        let state = lock_state(&self.state);

        let mut entries: Vec<EntrySnapshot> = state
            .entries
            .iter()
            .map(|(key, entry)| EntrySnapshot::from_entry(key, entry))
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        CacheSnapshot::new(entries, state.stats.clone())
    }
}
