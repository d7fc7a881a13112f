//! Cache Statistics Module
//!
//! Tracks hits, misses, evictions and expired removals, and builds the
//! snapshot handed out to callers.

// == Stats Counters ==
/// Cumulative counters, mutated under the cache lock.
///
/// Counters only ever grow; nothing resets them, not even `clear`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsCounters {
    /// Number of successful lookups
    pub hits: u64,
    /// Number of lookups that found nothing live
    pub misses: u64,
    /// Number of entries dropped to make room
    pub evictions: u64,
    /// Number of entries removed because their TTL elapsed
    pub expired_removals: u64,
}

impl StatsCounters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expired_removal(&mut self) {
        self.expired_removals += 1;
    }

    // == Snapshot ==
    /// Builds a snapshot combining the counters with the current sizes.
    pub fn snapshot(&self, current_size: usize, max_size: usize) -> CacheStats {
        let total_requests = self.hits + self.misses;
        let hit_rate = if total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / total_requests as f64 * 100.0
        };

        CacheStats {
            hits: self.hits,
            misses: self.misses,
            hit_rate,
            total_requests,
            current_size,
            max_size,
            evictions: self.evictions,
            expired_removals: self.expired_removals,
        }
    }
}

// == Cache Stats ==
/// Point-in-time statistics snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Percentage of lookups that hit, in `[0, 100]`; 0 when no lookups yet
    pub hit_rate: f64,
    /// `hits + misses`
    pub total_requests: u64,
    pub current_size: usize,
    pub max_size: usize,
    pub evictions: u64,
    pub expired_removals: u64,
}

impl CacheStats {
    // == Formatted Hit Rate ==
    /// Returns the hit rate as a percentage string with two decimals, e.g. `"50.00%"`.
    pub fn hit_rate_percent(&self) -> String {
        format!("{:.2}%", self.hit_rate)
    }
}
