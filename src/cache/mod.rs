//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod builder;
mod entry;
mod handle;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use builder::{CacheBuilder, MAX_SWEEP_INTERVAL};
pub use entry::EntryInfo;
pub use handle::Cache;
pub use stats::CacheStats;

pub(crate) use entry::CacheEntry;
pub(crate) use lru::LruTracker;
pub(crate) use stats::StatsCounters;
pub(crate) use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes for the HTTP API
pub const MAX_KEY_LENGTH: usize = 256;
