//! Cache Builder
//!
//! Validates construction parameters before a [`Cache`] and its sweeper
//! are created.

use std::marker::PhantomData;
use std::time::Duration;

use crate::cache::Cache;
use crate::config::{Config, DEFAULT_CAPACITY, DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};
use crate::error::{CacheError, Result};

/// Longest accepted sweeper period.
pub const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

// == Cache Builder ==
/// Builder for [`Cache`].
///
/// ```
/// use std::time::Duration;
/// use lru_ttl_cache::Cache;
///
/// let cache: Cache<String> = Cache::builder()
///     .capacity(10)
///     .default_ttl(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// cache.shutdown();
/// ```
#[derive(Debug, Clone)]
pub struct CacheBuilder<V> {
    capacity: usize,
    default_ttl: Duration,
    sweep_interval: Duration,
    _value: PhantomData<fn() -> V>,
}

impl<V> Default for CacheBuilder<V> {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            _value: PhantomData,
        }
    }
}

impl<V> CacheBuilder<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the cache section of a [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .capacity(config.capacity)
            .default_ttl(config.default_ttl)
            .sweep_interval(config.sweep_interval)
    }

    /// Maximum number of entries.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// TTL used when `put` gets no TTL or a negative one.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Period of the background expiry sweeper.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        if self.default_ttl.is_zero() {
            return Err(CacheError::InvalidDefaultTtl(self.default_ttl));
        }
        if self.sweep_interval.is_zero() || self.sweep_interval > MAX_SWEEP_INTERVAL {
            return Err(CacheError::InvalidSweepInterval(self.sweep_interval));
        }
        Ok(())
    }
}

impl<V: Clone + Send + 'static> CacheBuilder<V> {
    /// Validates the parameters, then creates the cache and starts its sweeper.
    ///
    /// # Errors
    /// Returns a configuration error for a zero capacity or default TTL, a
    /// sweep interval that is zero or above [`MAX_SWEEP_INTERVAL`], and
    /// [`CacheError::Internal`] if the sweeper thread cannot be spawned.
    pub fn build(self) -> Result<Cache<V>> {
        self.validate()?;
        Cache::start(self.capacity, self.default_ttl, self.sweep_interval)
    }
}
