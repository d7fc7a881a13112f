//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default maximum number of entries.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default TTL applied when `put` is called without one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default period between two expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(100);

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Values are validated when the cache is built, not here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TTL for entries inserted without an explicit (non-negative) TTL
    pub default_ttl: Duration,
    /// Period of the background expiry sweeper
    pub sweep_interval: Duration,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL_MS` - Expiry sweep period in milliseconds (default: 100)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            default_ttl: parse_var("DEFAULT_TTL")
                .map(Duration::from_secs)
                .unwrap_or(defaults.default_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.sweep_interval),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            server_port: 3000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
