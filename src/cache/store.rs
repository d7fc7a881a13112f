//! Cache Store Module
//!
//! The unsynchronized cache engine: HashMap storage combined with LRU
//! ordering, TTL expiration and statistics. Every method takes `&mut self`
//! or `&self`, so callers hold the single cache lock for the whole call and
//! helpers never need to re-acquire it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::TimeDelta;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, EntryInfo, LruTracker, StatsCounters};

#[derive(Debug)]
struct Slot<V> {
    entry: CacheEntry<V>,
    /// Position in the LRU tracker
    node: usize,
}

// == Cache Store ==
/// Cache storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, Slot<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Cumulative statistics
    counters: StatsCounters,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL for entries without an explicit non-negative TTL
    default_ttl: Duration,
}

impl<V> CacheStore<V> {
    // == Stats ==
    /// Returns a statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.entries.len(), self.capacity)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// No validation happens here; see [`crate::cache::CacheBuilder`].
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            counters: StatsCounters::default(),
            capacity,
            default_ttl,
        }
    }

    // == Put ==
    /// Inserts or replaces the value for `key`.
    ///
    /// An existing entry for the key is removed first, so an update never
    /// evicts anything by itself. If the cache is still full afterwards the
    /// least recently used entry is evicted. The new entry becomes the most
    /// recently used.
    pub fn put(&mut self, key: String, value: V, ttl: Option<TimeDelta>, now: Instant) {
        self.remove_entry(&key);

        if self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        let entry = CacheEntry::new(value, self.resolve_ttl(ttl), now);
        let node = self.lru.insert(key.clone());
        self.entries.insert(key, Slot { entry, node });
        debug_assert_eq!(self.lru.len(), self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// An expired entry is removed on the spot and counted both as a miss
    /// and as an expired removal. A hit moves the entry to the most
    /// recently used end.
    pub fn get(&mut self, key: &str, now: Instant) -> Option<V> {
        let (expired, node) = match self.entries.get(key) {
            Some(slot) => (slot.entry.is_expired_at(now), slot.node),
            None => {
                self.counters.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_entry(key);
            self.counters.record_expired_removal();
            self.counters.record_miss();
            debug!(key, "Removed expired key on read");
            return None;
        }

        self.lru.touch(node);
        self.counters.record_hit();
        self.entries.get(key).map(|slot| slot.entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry by key, returning whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Clear ==
    /// Removes every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Remove Expired ==
    /// Removes all entries whose expiry instant is strictly before `now`.
    ///
    /// Returns the removed keys.
    pub fn remove_expired(&mut self, now: Instant) -> Vec<String> {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, slot)| slot.entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
            self.counters.record_expired_removal();
        }

        expired_keys
    }

    // == Contains ==
    /// Checks for a live entry without touching recency or statistics.
    pub fn contains(&self, key: &str, now: Instant) -> bool {
        self.entries
            .get(key)
            .is_some_and(|slot| !slot.entry.is_expired_at(now))
    }

    // == Entries ==
    /// Lists entries from least to most recently used.
    ///
    /// Reporting only: recency and statistics are left untouched, and
    /// entries that expired but were not yet swept show a zero TTL.
    pub fn entries(&self, now: Instant) -> Vec<EntryInfo<V>> {
        self.lru
            .iter_oldest_first()
            .filter_map(|key| {
                self.entries.get(key).map(|slot| EntryInfo {
                    key: key.to_string(),
                    value: slot.entry.value.clone(),
                    ttl_remaining: slot.entry.ttl_remaining_at(now),
                    created_at: slot.entry.created_at,
                })
            })
            .collect()
    }

    /// Negative or missing TTLs fall back to the default; zero is honored.
    fn resolve_ttl(&self, ttl: Option<TimeDelta>) -> Duration {
        ttl.and_then(|t| t.to_std().ok())
            .unwrap_or(self.default_ttl)
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let slot = self.entries.remove(key)?;
        self.lru.remove(slot.node);
        Some(slot.entry)
    }

    fn evict_lru(&mut self) {
        if let Some(evicted) = self.lru.evict_oldest() {
            self.entries.remove(&evicted);
            self.counters.record_eviction();
            debug!(key = %evicted, "Evicted least recently used key");
        }
    }
}
