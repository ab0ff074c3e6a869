//! Insertion Order Module
//!
//! Tracks the order keys were written in, for FIFO eviction.

use std::collections::VecDeque;

// == Insertion Order ==
/// Tracks write order for FIFO eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest write
/// - Back = Most recent write
///
/// Reads never reorder keys; only writes do.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Records a write of `key`, making it the newest entry.
    ///
    /// An existing occurrence is removed first, so a rewritten key moves to
    /// the back of the eviction queue.
    pub fn record(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest written key.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
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
    fn test_record_new_keys() {
        let mut order = InsertionOrder::new();

        order.record("key1");
        order.record("key2");
        order.record("key3");

        assert_eq!(order.len(), 3);
        assert_eq!(order.pop_oldest(), Some("key1".to_string()));
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn test_record_existing_key_moves_to_back() {
        let mut order = InsertionOrder::new();

        order.record("a");
        order.record("b");
        order.record("c");

        // Rewriting 'a' makes 'b' the oldest
        order.record("a");

        assert_eq!(order.len(), 3);
        assert_eq!(order.pop_oldest(), Some("b".to_string()));
        assert_eq!(order.pop_oldest(), Some("c".to_string()));
        assert_eq!(order.pop_oldest(), Some("a".to_string()));
    }

    #[test]
    fn test_pop_oldest_empty() {
        let mut order = InsertionOrder::new();
        assert_eq!(order.pop_oldest(), None);
    }

    #[test]
    fn test_remove() {
        let mut order = InsertionOrder::new();

        order.record("key1");
        order.record("key2");
        order.record("key3");

        order.remove("key2");

        assert_eq!(order.len(), 2);
        assert!(!order.contains("key2"));
        assert!(order.contains("key1"));
        assert!(order.contains("key3"));
    }

    #[test]
    fn test_remove_nonexistent_key() {
        let mut order = InsertionOrder::new();

        order.record("key1");
        order.remove("nonexistent");

        assert_eq!(order.len(), 1);
        assert!(order.contains("key1"));
    }

    #[test]
    fn test_record_same_key_multiple_times() {
        let mut order = InsertionOrder::new();

        order.record("key1");
        order.record("key1");
        order.record("key1");

        assert_eq!(order.len(), 1);
        assert_eq!(order.pop_oldest(), Some("key1".to_string()));
        assert!(order.is_empty());
    }
}
