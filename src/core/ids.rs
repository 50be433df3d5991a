//! # Job identity allocator.
//!
//! Issues unique, monotonically increasing job ids. An explicit owned
//! component held by the pool — not module-global state — so multiple pools
//! can coexist in one process (and in tests) with independent id spaces.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::jobs::JobId;

/// Thread-safe monotonic id counter, starting at 1.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Creates an allocator whose first id is 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Returns the next unused id, strictly greater than all previously
    /// returned values. Ids are never reused, even after the job is
    /// archived.
    pub fn allocate(&self) -> JobId {
        JobId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
