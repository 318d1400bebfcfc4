//! Stats Reporting Task
//!
//! Background task that periodically logs a JSON snapshot of cache
//! statistics.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::SharedCache;

/// Spawns a background task that logs cache stats at a fixed interval.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between reports. Each report takes the cache lock only long enough to
/// clone the counters.
///
/// # Arguments
/// * `cache` - Shared cache handle
/// * `interval_secs` - Seconds between reports
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
pub fn spawn_stats_task(cache: SharedCache, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting stats reporting task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let stats = cache.stats().await;
            let hit_rate = stats.hit_rate();
            match serde_json::to_string(&stats) {
                Ok(snapshot) => info!(hit_rate, "cache stats: {}", snapshot),
                Err(err) => warn!(%err, "failed to serialize cache stats"),
            }
        }
    })
}
