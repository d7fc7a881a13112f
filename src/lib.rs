//! LRU TTL Cache - A thread-safe in-process cache
//!
//! Bounded key-value cache with least-recently-used eviction, per-entry
//! TTL expiration and a background expiry sweeper, plus a small JSON API
//! for exposing a cache over HTTP.
//!
//! ```
//! use std::time::Duration;
//! use lru_ttl_cache::Cache;
//!
//! let cache = Cache::new(3, Duration::from_secs(300)).unwrap();
//! cache.put("k1", 1);
//! assert_eq!(cache.get("k1"), Some(1));
//! assert_eq!(cache.get("k2"), None);
//! assert_eq!(cache.stats().hit_rate_percent(), "50.00%");
//! cache.shutdown();
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheBuilder, CacheStats, EntryInfo};
pub use config::Config;
pub use error::CacheError;
