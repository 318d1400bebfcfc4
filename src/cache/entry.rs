//! Cached Object Module
//!
//! Defines the structure for individual cached web objects with an age counter.

use std::sync::Arc;

// == Cached Object ==
/// A single cached response body with its recency age.
///
/// The payload is reference-counted: a session serving a hit holds its own
/// clone of the `Arc`, so eviction only drops the store's reference and the
/// bytes stay alive until the last reader is done with them.
#[derive(Debug, Clone)]
pub struct CachedObject {
    /// The captured response body
    payload: Arc<Vec<u8>>,
    /// Ticks since this object was last accessed; 0 = just touched
    age: u64,
}

impl CachedObject {
    // == Constructor ==
    /// Creates a new cached object with age 0.
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload: Arc::new(payload),
            age: 0,
        }
    }

    // == Size ==
    /// Byte length of the payload, counted against total capacity.
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    // == Age ==
    /// Current age in logical-clock ticks.
    pub fn age(&self) -> u64 {
        self.age
    }

    // == Tick ==
    /// Advances the age by one tick.
    pub fn tick(&mut self) {
        self.age += 1;
    }

    // == Touch ==
    /// Resets the age to 0, marking the object as just accessed.
    pub fn touch(&mut self) {
        self.age = 0;
    }

    // == Payload ==
    /// Returns a cheap reference-counted clone of the payload.
    pub fn payload(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.payload)
    }
}
