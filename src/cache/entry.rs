//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// TTLs are clamped to this value so `Instant` arithmetic cannot overflow.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// Expiry is tracked on the monotonic clock; `created_at` is wall-clock
/// time and only used for reporting.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion timestamp
    pub created_at: DateTime<Utc>,
    /// Instant after which the entry is expired
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` after `now`.
    pub fn new(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            created_at: Utc::now(),
            expires_at: now + ttl.min(MAX_TTL),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Strict comparison: an entry is still live at exactly its expiry instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    /// Checks if the entry has expired as of the current instant.
    #[cfg(test)]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining TTL as of `now`, zero once expired.
    pub fn ttl_remaining_at(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

// == Entry Info ==
/// Read-only view of a live entry, used for reporting cache contents.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInfo<V> {
    /// The entry key
    pub key: String,
    /// A clone of the stored value
    pub value: V,
    /// Time left before expiry
    pub ttl_remaining: Duration,
    /// Insertion timestamp
    pub created_at: DateTime<Utc>,
}
