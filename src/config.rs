//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;

use crate::cache::{MAX_CACHE_SIZE, MAX_OBJECT_SIZE};

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// `max_object_size` must stay strictly below `max_cache_size`; an object that
/// alone exceeds total capacity could never be admitted.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port the proxy listens on
    pub server_port: u16,
    /// Total cache capacity in bytes
    pub max_cache_size: usize,
    /// Per-object cache-eligibility cap in bytes
    pub max_object_size: usize,
    /// Interval in seconds between stats log lines
    pub stats_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - Listening port (default: 8080)
    /// - `MAX_CACHE_SIZE` - Total cache capacity in bytes (default: 1 MiB)
    /// - `MAX_OBJECT_SIZE` - Per-object cap in bytes (default: 100 KiB)
    /// - `STATS_INTERVAL` - Stats reporting frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            max_cache_size: env::var("MAX_CACHE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_CACHE_SIZE),
            max_object_size: env::var("MAX_OBJECT_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_OBJECT_SIZE),
            stats_interval: env::var("STATS_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            max_cache_size: MAX_CACHE_SIZE,
            max_object_size: MAX_OBJECT_SIZE,
            stats_interval: 60,
        }
    }
}
