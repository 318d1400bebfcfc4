//! Mini Proxy - A lightweight caching HTTP forward proxy
//!
//! Relays GET requests to origin servers and serves repeated requests from
//! an in-memory cache with recency-based eviction.

pub mod cache;
pub mod config;
pub mod error;
pub mod proxy;
pub mod server;
pub mod tasks;

pub use cache::SharedCache;
pub use config::Config;
pub use tasks::spawn_stats_task;
