//! Server Module
//!
//! The connection dispatcher: accepts clients and hands each one to a
//! detached relay session task.

use std::future::Future;

use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::cache::SharedCache;
use crate::proxy::handle_connection;

// == Accept Loop ==
/// Accepts connections until `shutdown` completes, spawning one detached
/// task per client.
///
/// Sessions are unbounded and untracked: shutdown stops the accept loop but
/// does not drain in-flight relays. Session failures are logged, never
/// propagated; a broken client or origin only ends its own session.
pub async fn serve(
    listener: TcpListener,
    cache: SharedCache,
    shutdown: impl Future<Output = ()>,
) -> std::io::Result<()> {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                info!("Accepted connection from {}", peer);

                let cache = cache.clone();
                tokio::spawn(async move {
                    if let Err(err) = handle_connection(stream, cache).await {
                        debug!(%peer, %err, "session terminated");
                    }
                });
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received, no longer accepting connections");
                return Ok(());
            }
        }
    }
}
