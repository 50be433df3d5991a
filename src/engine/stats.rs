//! # Per-job statistics collector.
//!
//! [`StatsCollector`] owns a job's running counters. The engine mutates
//! them during the crawl; the orchestration layer only ever reads
//! snapshots. Each mutation emits a [`StatsChange`] on the collector's own
//! stream — an event source independent of the job's lifecycle signals,
//! which the mapper folds into the same canonical taxonomy
//! (`stats-changed`).
//!
//! ## Rules
//! - Counters are keyed by free-form string (e.g. `"item_scraped_count"`).
//! - `snapshot()` returns a detached copy; archived stats never alias the
//!   live map.
//! - The change stream is best-effort: if nobody listens, changes are
//!   simply not announced.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use tokio::sync::broadcast;

/// A single counter update announced by a [`StatsCollector`].
#[derive(Debug, Clone)]
pub struct StatsChange {
    /// Counter key.
    pub key: Arc<str>,
    /// Counter value after the update.
    pub value: i64,
}

/// Mutable counter map owned by one job, with a change stream.
pub struct StatsCollector {
    counters: RwLock<HashMap<String, i64>>,
    tx: broadcast::Sender<StatsChange>,
}

impl StatsCollector {
    /// Creates an empty collector with the given change-stream capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            counters: RwLock::new(HashMap::new()),
            tx,
        }
    }

    /// Sets a counter to an absolute value and announces the change.
    pub fn set_value(&self, key: &str, value: i64) {
        {
            let mut counters = self.counters.write().unwrap_or_else(|e| e.into_inner());
            counters.insert(key.to_string(), value);
        }
        let _ = self.tx.send(StatsChange {
            key: Arc::from(key),
            value,
        });
    }

    /// Increments a counter by `delta` (creating it at zero) and announces
    /// the new value.
    pub fn inc_value(&self, key: &str, delta: i64) -> i64 {
        let value = {
            let mut counters = self.counters.write().unwrap_or_else(|e| e.into_inner());
            let slot = counters.entry(key.to_string()).or_insert(0);
            *slot += delta;
            *slot
        };
        let _ = self.tx.send(StatsChange {
            key: Arc::from(key),
            value,
        });
        value
    }

    /// Returns the current value of a counter, if present.
    pub fn get_value(&self, key: &str) -> Option<i64> {
        let counters = self.counters.read().unwrap_or_else(|e| e.into_inner());
        counters.get(key).copied()
    }

    /// Returns a detached copy of all counters.
    pub fn snapshot(&self) -> HashMap<String, i64> {
        let counters = self.counters.read().unwrap_or_else(|e| e.into_inner());
        counters.clone()
    }

    /// Creates a new receiver for the change stream.
    pub fn changes(&self) -> broadcast::Receiver<StatsChange> {
        self.tx.subscribe()
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inc_creates_and_accumulates() {
        let stats = StatsCollector::default();
        assert_eq!(stats.inc_value("pages", 1), 1);
        assert_eq!(stats.inc_value("pages", 2), 3);
        assert_eq!(stats.get_value("pages"), Some(3));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let stats = StatsCollector::default();
        stats.set_value("items", 5);
        let snap = stats.snapshot();
        stats.set_value("items", 9);
        assert_eq!(snap.get("items"), Some(&5));
    }

    #[tokio::test]
    async fn test_changes_are_announced() {
        let stats = StatsCollector::default();
        let mut rx = stats.changes();
        stats.set_value("requests", 7);
        let change = rx.recv().await.expect("change announced");
        assert_eq!(&*change.key, "requests");
        assert_eq!(change.value, 7);
    }
}
