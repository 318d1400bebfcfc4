//! Mini Proxy - A lightweight caching HTTP forward proxy
//!
//! Relays GET requests to origin servers and serves repeated requests from
//! an in-memory cache with recency-based eviction.

mod cache;
mod config;
mod error;
mod proxy;
mod server;
mod tasks;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache::SharedCache;
use config::Config;
use tasks::spawn_stats_task;

/// Main entry point for the Mini Proxy server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache with configured capacity bounds
/// 4. Start the background stats reporting task
/// 5. Bind the listening socket and run the accept loop
/// 6. Stop accepting on SIGINT/SIGTERM (in-flight sessions are detached)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_proxy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini Proxy");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, max_cache_size={}, max_object_size={}, stats_interval={}s",
        config.server_port, config.max_cache_size, config.max_object_size, config.stats_interval
    );

    // Create the shared cache
    let cache = SharedCache::from_config(&config);
    info!("Cache initialized");

    // Start background stats task
    let stats_handle = spawn_stats_task(cache.clone(), config.stats_interval);
    info!("Background stats task started");

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Proxy listening on {}", addr);

    // Run the accept loop until a shutdown signal arrives
    server::serve(listener, cache, shutdown_signal(stats_handle)).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the stats task; detached sessions are not
/// drained.
async fn shutdown_signal(stats_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the stats task
    stats_handle.abort();
    warn!("Stats task aborted");
}
