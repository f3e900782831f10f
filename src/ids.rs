use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Hands out tip ids. Upstream ids are never trusted since saved and selected
/// tips are keyed by id across regenerations.
///
/// Seeded from the wall clock so ids from a fresh process are unlikely to collide
/// with ones persisted by an earlier run; after that it is a plain counter.
#[derive(Debug)]
pub struct TipIdGenerator {
    next: AtomicI64,
}

impl TipIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(Utc::now().timestamp_millis())
    }

    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }

    /// Reserve `count` consecutive ids.
    pub fn reserve(&self, count: usize) -> std::ops::Range<i64> {
        let count = count as i64;
        let start = self.next.fetch_add(count, Ordering::Relaxed);
        start..start + count
    }
}

impl Default for TipIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
