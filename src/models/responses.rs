//! Response DTOs for the cache HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, EntryInfo};

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the CLEAR operation (POST /clear)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn new() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

impl Default for ClearResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the stats endpoint (GET /stats)
///
/// Same fields as [`CacheStats`], with the hit rate rendered as a
/// percentage string such as `"50.00%"`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: String,
    pub total_requests: u64,
    pub current_size: usize,
    pub max_size: usize,
    pub evictions: u64,
    pub expired_removals: u64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate_percent(),
            hits: stats.hits,
            misses: stats.misses,
            total_requests: stats.total_requests,
            current_size: stats.current_size,
            max_size: stats.max_size,
            evictions: stats.evictions,
            expired_removals: stats.expired_removals,
        }
    }
}

/// One row of the entries listing (GET /entries)
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub value: String,
    /// Remaining TTL in seconds, rounded to one decimal
    pub ttl_remaining_secs: f64,
    /// Insertion time in RFC 3339 format
    pub created_at: String,
}

impl From<EntryInfo<String>> for EntryResponse {
    fn from(info: EntryInfo<String>) -> Self {
        Self {
            ttl_remaining_secs: (info.ttl_remaining.as_secs_f64() * 10.0).round() / 10.0,
            created_at: info.created_at.to_rfc3339(),
            key: info.key,
            value: info.value,
        }
    }
}

/// Response body for the entries listing (GET /entries)
///
/// Entries are ordered from least to most recently used.
#[derive(Debug, Clone, Serialize)]
pub struct EntriesResponse {
    pub count: usize,
    pub entries: Vec<EntryResponse>,
}

impl EntriesResponse {
    pub fn new(entries: Vec<EntryInfo<String>>) -> Self {
        let entries: Vec<EntryResponse> = entries.into_iter().map(Into::into).collect();
        Self {
            count: entries.len(),
            entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
