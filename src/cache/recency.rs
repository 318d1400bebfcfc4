//! Insertion Order Module
//!
//! Tracks the order in which keys entered the store so victim selection is
//! deterministic.

// == Insertion Order ==
/// Keeps cache keys in insertion order.
///
/// HashMap iteration order is arbitrary, so the eviction scan walks this
/// list instead: front = oldest insertion, back = newest. When two objects
/// tie for largest age, the one encountered first here is the victim.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    /// Keys ordered oldest-insertion-first
    keys: Vec<String>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty order tracker.
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    // == Push ==
    /// Records a newly inserted key at the back.
    pub fn push(&mut self, key: &str) {
        self.keys.push(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.keys.retain(|k| k != key);
    }

    // == Iter ==
    /// Iterates keys oldest-insertion-first.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.keys.iter()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_new() {
        let order = InsertionOrder::new();
        assert!(order.is_empty());
        assert_eq!(order.len(), 0);
    }

    #[test]
    fn test_order_preserves_insertion_sequence() {
        let mut order = InsertionOrder::new();

        order.push("key1");
        order.push("key2");
        order.push("key3");

        let keys: Vec<&String> = order.iter().collect();
        assert_eq!(keys, vec!["key1", "key2", "key3"]);
    }

    #[test]
    fn test_order_remove() {
        let mut order = InsertionOrder::new();

        order.push("key1");
        order.push("key2");
        order.push("key3");

        order.remove("key2");

        assert_eq!(order.len(), 2);
        assert!(!order.contains("key2"));
        assert!(order.contains("key1"));
        assert!(order.contains("key3"));
    }

    #[test]
    fn test_order_remove_nonexistent_key() {
        let mut order = InsertionOrder::new();

        order.push("key1");

        // Remove a key that doesn't exist - should not affect existing keys
        order.remove("nonexistent");

        assert_eq!(order.len(), 1);
        assert!(order.contains("key1"));
    }

    #[test]
    fn test_order_stable_after_removal() {
        let mut order = InsertionOrder::new();

        order.push("a");
        order.push("b");
        order.push("c");
        order.remove("a");
        order.push("d");

        let keys: Vec<&String> = order.iter().collect();
        assert_eq!(keys, vec!["b", "c", "d"]);
    }
}
