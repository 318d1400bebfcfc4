//! Shared Cache Module
//!
//! Thread-safe wrapper around [`CacheStore`]: one process-wide exclusive
//! critical section serializes every cache-touching operation.

use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;

// == Shared Cache ==
/// The session-facing cache API, cloneable across connection tasks.
///
/// A single coarse mutex is deliberate: the dominant cost inside it is a
/// linear scan over a small size-bounded object set, and one critical
/// section rules out lost updates and double evictions without a lock
/// hierarchy. Payload writes to the client happen outside the lock; the
/// payload is an `Arc` clone, so a concurrent eviction cannot free bytes a
/// hit is still streaming.
#[derive(Clone)]
pub struct SharedCache {
    /// Store guarded by the one critical section
    inner: Arc<Mutex<CacheStore>>,
    /// Per-object admission cap, checked before taking the lock
    max_object_size: usize,
}

impl SharedCache {
    /// Creates a new SharedCache around the given store.
    pub fn new(store: CacheStore) -> Self {
        let max_object_size = store.max_object_size();
        Self {
            inner: Arc::new(Mutex::new(store)),
            max_object_size,
        }
    }

    /// Creates a new SharedCache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheStore::new(config.max_cache_size, config.max_object_size))
    }

    // == Check And Serve ==
    /// Probes the cache and, on a hit, streams the payload to `sink`.
    ///
    /// The lock is held only for the tick and lookup; the payload copy runs
    /// after release. Returns `Ok(true)` if the request was served from the
    /// cache, `Ok(false)` on a miss.
    pub async fn check_and_serve<W>(&self, key: &str, sink: &mut W) -> std::io::Result<bool>
    where
        W: AsyncWrite + Unpin,
    {
        let payload = {
            let mut store = self.inner.lock().await;
            store.lookup(key)
        };

        match payload {
            Some(body) => {
                debug!(key, bytes = body.len(), "cache hit");
                sink.write_all(&body).await?;
                sink.flush().await?;
                Ok(true)
            }
            None => {
                debug!(key, "cache miss");
                Ok(false)
            }
        }
    }

    // == Offer ==
    /// Offers a fully relayed response body for admission.
    ///
    /// Oversize payloads are refused before taking the lock; duplicate keys
    /// are refused inside the store. Neither is signalled to the caller.
    pub async fn offer(&self, key: &str, payload: Vec<u8>) {
        if payload.len() > self.max_object_size {
            return;
        }
        let mut store = self.inner.lock().await;
        store.insert(key.to_string(), payload);
    }

    // == Per-Object Cap ==
    /// The per-object admission cap, used by sessions to bound buffering.
    pub fn max_object_size(&self) -> usize {
        self.max_object_size
    }

    // == Stats ==
    /// Returns a snapshot of cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    /// Whether a key is currently cached, without ticking the clock.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.inner.lock().await.contains_key(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> SharedCache {
        SharedCache::new(CacheStore::new(1000, 100))
    }

    #[tokio::test]
    async fn test_serve_miss_writes_nothing() {
        let cache = shared();
        let mut sink = Vec::new();

        let served = cache.check_and_serve("http://a/", &mut sink).await.unwrap();

        assert!(!served);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_offer_then_serve() {
        let cache = shared();
        cache.offer("http://a/", b"response body".to_vec()).await;

        let mut sink = Vec::new();
        let served = cache.check_and_serve("http://a/", &mut sink).await.unwrap();

        assert!(served);
        assert_eq!(sink, b"response body");
    }

    #[tokio::test]
    async fn test_offer_oversize_is_refused() {
        let cache = shared();
        cache.offer("http://big/", vec![0u8; 101]).await;

        assert!(!cache.contains_key("http://big/").await);
    }

    #[tokio::test]
    async fn test_offer_duplicate_keeps_first_payload() {
        let cache = shared();
        cache.offer("http://a/", b"first".to_vec()).await;
        cache.offer("http://a/", b"second".to_vec()).await;

        let mut sink = Vec::new();
        cache.check_and_serve("http://a/", &mut sink).await.unwrap();
        assert_eq!(sink, b"first");
    }

    #[tokio::test]
    async fn test_concurrent_offers_stay_within_capacity() {
        let cache = SharedCache::new(CacheStore::new(500, 100));

        let mut handles = Vec::new();
        for i in 0..20 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache.offer(&format!("http://o/{}", i), vec![0u8; 100]).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stats = cache.stats().await;
        assert!(stats.total_bytes <= 500);
        assert_eq!(stats.total_objects, 5);
    }
}
