//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Cache operations
//! themselves never fail; errors come from construction and from the
//! HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Capacity must hold at least one entry
    #[error("Invalid capacity: {0} (must be greater than zero)")]
    InvalidCapacity(usize),

    /// Default TTL must be strictly positive
    #[error("Invalid default TTL: {0:?} (must be greater than zero)")]
    InvalidDefaultTtl(std::time::Duration),

    /// Sweep interval must be positive and at most one day
    #[error("Invalid sweep interval: {0:?} (must be greater than zero and at most 24h)")]
    InvalidSweepInterval(std::time::Duration),

    /// Key not found in cache (or already expired)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error, e.g. the sweeper thread could not be spawned
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::InvalidCapacity(_)
            | CacheError::InvalidDefaultTtl(_)
            | CacheError::InvalidSweepInterval(_)
            | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
