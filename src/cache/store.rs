//! Cache Store Module
//!
//! The recency clock and store: owns the cached objects, the logical clock,
//! size accounting, and the eviction policy.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{CacheStats, CachedObject, InsertionOrder};

// == Cache Store ==
/// Bounded in-memory store of web objects with aging-counter eviction.
///
/// Every cache-touching operation starts by ticking a logical clock that
/// ages all live objects; the accessed object is then reset to age 0. The
/// object with the largest age is therefore the least recently touched and
/// is the eviction victim when capacity runs out.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-object storage, keyed by full request URL
    entries: HashMap<String, CachedObject>,
    /// Insertion order of live keys, for deterministic victim scans
    order: InsertionOrder,
    /// Performance statistics
    stats: CacheStats,
    /// Sum of all live objects' payload sizes
    total_size: usize,
    /// Total capacity bound in bytes
    max_cache_size: usize,
    /// Per-object admission cap in bytes
    max_object_size: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity bounds.
    ///
    /// # Arguments
    /// * `max_cache_size` - Total capacity in bytes across all objects
    /// * `max_object_size` - Largest admissible single payload in bytes
    pub fn new(max_cache_size: usize, max_object_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            total_size: 0,
            max_cache_size,
            max_object_size,
        }
    }

    // == Tick ==
    /// Advances the logical clock: every live object ages by one.
    fn tick(&mut self) {
        for obj in self.entries.values_mut() {
            obj.tick();
        }
    }

    // == Lookup ==
    /// Probes the store for a key.
    ///
    /// Ticks the clock, then on a hit resets the object's age to 0 and
    /// returns a reference-counted clone of its payload; the caller streams
    /// it without holding any lock. A miss is a normal outcome, not an error.
    ///
    /// # Arguments
    /// * `key` - The request URL to look up
    pub fn lookup(&mut self, key: &str) -> Option<Arc<Vec<u8>>> {
        self.tick();

        if let Some(obj) = self.entries.get_mut(key) {
            obj.touch();
            self.stats.record_hit();
            Some(obj.payload())
        } else {
            self.stats.record_miss();
            None
        }
    }

    // == Insert ==
    /// Admits a payload under a key, evicting older objects to make room.
    ///
    /// Silently refuses payloads above the per-object cap and keys that are
    /// already present (first writer wins; an object is only replaced by
    /// being evicted, which is capacity-driven). Both refusals are normal
    /// control flow with no signal to the caller.
    ///
    /// # Arguments
    /// * `key` - The request URL
    /// * `payload` - The full response body to cache
    pub fn insert(&mut self, key: String, payload: Vec<u8>) {
        if payload.len() > self.max_object_size {
            return;
        }

        self.tick();

        // Duplicate suppression: the first writer for a key wins
        if self.entries.contains_key(&key) {
            return;
        }

        let obj = CachedObject::new(payload);
        if self.total_size + obj.size() > self.max_cache_size {
            self.evict_to_fit(obj.size());
        }

        self.total_size += obj.size();
        self.order.push(&key);
        self.entries.insert(key, obj);
        self.stats.set_usage(self.entries.len(), self.total_size);
    }

    // == Evict Victim ==
    /// Selects the eviction victim: the object with the strictly largest age.
    ///
    /// The scan walks keys in insertion order, so when two objects tie for
    /// largest age the earlier-inserted one is chosen. Deterministic by
    /// policy, not left to map iteration order.
    fn evict_victim(&self) -> Option<String> {
        let mut victim: Option<(&String, u64)> = None;
        for key in self.order.iter() {
            let age = self.entries[key].age();
            match victim {
                Some((_, max_age)) if age <= max_age => {}
                _ => victim = Some((key, age)),
            }
        }
        victim.map(|(key, _)| key.clone())
    }

    // == Evict To Fit ==
    /// Removes victims until `additional` more bytes fit under capacity.
    ///
    /// Terminates with an empty store if `additional` alone exceeds total
    /// capacity; that can only happen on a caller error since the per-object
    /// cap is strictly below total capacity.
    fn evict_to_fit(&mut self, additional: usize) {
        while self.total_size + additional > self.max_cache_size {
            let Some(key) = self.evict_victim() else {
                break;
            };
            if let Some(obj) = self.entries.remove(&key) {
                self.total_size -= obj.size();
            }
            self.order.remove(&key);
            self.stats.record_eviction();
        }
        self.stats.set_usage(self.entries.len(), self.total_size);
    }

    // == Contains ==
    /// Checks whether a key is currently cached, without ticking the clock.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Stats ==
    /// Returns a snapshot of current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_usage(self.entries.len(), self.total_size);
        stats
    }

    // == Total Size ==
    /// Current sum of live payload sizes in bytes.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    // == Per-Object Cap ==
    /// The per-object admission cap in bytes.
    pub fn max_object_size(&self) -> usize {
        self.max_object_size
    }

    // == Length ==
    /// Returns the current number of cached objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Age of a cached object, for tests.
    #[cfg(test)]
    pub(crate) fn age_of(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|obj| obj.age())
    }

    /// Forces an object's age, for exercising victim ties in tests.
    #[cfg(test)]
    fn set_age(&mut self, key: &str, age: u64) {
        let obj = self.entries.get_mut(key).unwrap();
        obj.touch();
        for _ in 0..age {
            obj.tick();
        }
    }
}
