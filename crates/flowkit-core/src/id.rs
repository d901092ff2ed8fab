//! Id generation for diagram elements.
//!
//! Element ids come from a monotonic generator owned by the store and passed
//! into the factories, rather than from hidden process-wide counters. The
//! generator can be reseeded after loading a document so fresh ids never
//! collide with loaded ones.

use serde::{Deserialize, Serialize};

/// Monotonic element id source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Creates a generator whose first id is 1. Id 0 is never handed out so
    /// it can serve as a sentinel in external records.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next id and advances the counter.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Ensures all future ids are strictly greater than `id`.
    ///
    /// Used after deserialization: reseed above the highest loaded id.
    pub fn reseed_above(&mut self, id: u64) {
        if self.next <= id {
            self.next = id + 1;
        }
    }

    /// Returns the id the next call to [`next_id`](Self::next_id) would yield.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
