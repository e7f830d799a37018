//! Recency List Module
//!
//! Bounded most-recent-first list of viewed product ids.

use std::collections::VecDeque;

// == Recency List ==
/// Ordered product ids, most recent at the front.
///
/// Unlike an LRU tracker this never de-duplicates: every push lands at the
/// front and the oldest ids fall off the back once the bound is reached.
#[derive(Debug, Default, Clone)]
pub struct RecencyList {
    order: VecDeque<u64>,
}

impl RecencyList {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Push ==
    /// Pushes `id` to the front, then keeps only the `capacity` newest ids.
    pub fn push(&mut self, id: u64, capacity: usize) {
        self.order.push_front(id);
        self.order.truncate(capacity);
    }

    // == Snapshot ==
    /// Returns every id, most recent first.
    pub fn ids(&self) -> Vec<u64> {
        self.order.iter().copied().collect()
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
