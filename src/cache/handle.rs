//! Thread-safe Cache Handle
//!
//! Wraps the cache engine in a single lock shared by callers and the
//! expiry sweeper, and owns the sweeper's lifecycle.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::TimeDelta;
use parking_lot::Mutex;
use tracing::info;

use crate::cache::{CacheBuilder, CacheStats, CacheStore, EntryInfo};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::Sweeper;

// == Cache ==
/// In-process key-value cache with LRU eviction and per-entry TTL.
///
/// Every operation runs under one lock, which the background sweeper also
/// takes, so concurrent calls behave like some serial order of them. Share
/// it across threads with `Arc<Cache<V>>`.
///
/// Values are returned by clone; store `Arc<T>` to hand out shared handles.
///
/// Call [`Cache::shutdown`] when done with the cache. Dropping it stops the
/// sweeper as well, but an explicit shutdown keeps the point where the
/// thread is joined visible.
pub struct Cache<V> {
    store: Arc<Mutex<CacheStore<V>>>,
    sweeper: Mutex<Sweeper>,
}

impl<V: Clone + Send + 'static> Cache<V> {
    // == Constructors ==
    /// Creates a cache with the given capacity and default TTL and the
    /// default sweep interval.
    ///
    /// # Errors
    /// Fails if `capacity` is zero or `default_ttl` is zero.
    pub fn new(capacity: usize, default_ttl: Duration) -> Result<Self> {
        Self::builder()
            .capacity(capacity)
            .default_ttl(default_ttl)
            .build()
    }

    pub fn builder() -> CacheBuilder<V> {
        CacheBuilder::new()
    }

    /// Creates a cache from the cache settings of a [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        CacheBuilder::from_config(config).build()
    }

    /// Parameters are validated by the builder.
    pub(crate) fn start(
        capacity: usize,
        default_ttl: Duration,
        sweep_interval: Duration,
    ) -> Result<Self> {
        let store = Arc::new(Mutex::new(CacheStore::new(capacity, default_ttl)));
        let sweeper = Sweeper::spawn(store.clone(), sweep_interval)?;

        info!(
            capacity,
            default_ttl_secs = default_ttl.as_secs_f64(),
            "Cache initialized"
        );

        Ok(Self {
            store,
            sweeper: Mutex::new(sweeper),
        })
    }

    // == Put ==
    /// Inserts or replaces `key` using the default TTL.
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.store.lock().put(key.into(), value, None, Instant::now());
    }

    /// Inserts or replaces `key` with an explicit TTL.
    ///
    /// A negative `ttl` falls back to the default TTL. A zero `ttl` is kept,
    /// so the entry expires almost immediately.
    pub fn put_with_ttl(&self, key: impl Into<String>, value: V, ttl: TimeDelta) {
        self.store
            .lock()
            .put(key.into(), value, Some(ttl), Instant::now());
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// Counts exactly one hit or one miss; an expired entry is removed and
    /// also counted as an expired removal.
    pub fn get(&self, key: &str) -> Option<V> {
        self.store.lock().get(key, Instant::now())
    }

    // == Delete ==
    /// Removes `key`, returning whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        self.store.lock().delete(key)
    }

    // == Clear ==
    /// Removes all entries. Statistics are cumulative and are not reset.
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    /// Checks for a live entry without affecting recency or statistics.
    pub fn contains(&self, key: &str) -> bool {
        self.store.lock().contains(key, Instant::now())
    }

    // == Reporting ==
    /// Returns a consistent statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    /// Lists current entries from least to most recently used.
    pub fn entries(&self) -> Vec<EntryInfo<V>> {
        self.store.lock().entries(Instant::now())
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    pub fn default_ttl(&self) -> Duration {
        self.store.lock().default_ttl()
    }
}

impl<V> Cache<V> {
    // == Shutdown ==
    /// Stops the expiry sweeper and waits for its thread to exit.
    ///
    /// Idempotent. The cache stays usable afterwards, relying on expiry at
    /// read time only.
    pub fn shutdown(&self) {
        let mut sweeper = self.sweeper.lock();
        let was_running = sweeper.is_running();
        sweeper.stop();
        if was_running {
            info!("Cache shut down");
        }
    }

    /// Returns true until [`Cache::shutdown`] has completed.
    pub fn is_sweeper_running(&self) -> bool {
        self.sweeper.lock().is_running()
    }
}

impl<V> Drop for Cache<V> {
    fn drop(&mut self) {
        self.sweeper.get_mut().stop();
    }
}

impl<V> std::fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.store.lock();
        f.debug_struct("Cache")
            .field("len", &store.len())
            .field("capacity", &store.capacity())
            .finish_non_exhaustive()
    }
}
