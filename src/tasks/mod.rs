//! Background Tasks Module
//!
//! Contains background tasks that run periodically during proxy operation.
//!
//! # Tasks
//! - Stats reporting: logs a cache statistics snapshot at configured intervals

mod stats;

pub use stats::spawn_stats_task;
