//! Cache Module
//!
//! Provides an in-memory web-object cache with aging-counter recency eviction.

mod entry;
mod recency;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CachedObject;
pub use recency::InsertionOrder;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default total cache capacity in bytes
pub const MAX_CACHE_SIZE: usize = 1024 * 1024; // 1 MiB

/// Default per-object cache-eligibility cap in bytes
pub const MAX_OBJECT_SIZE: usize = 100 * 1024; // 100 KiB
