//! # Broadcast stream of canonical events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that carries
//! the unified event stream: every canonical [`Event`] published by the
//! pool, in `seq` order, observable by any number of independent receivers.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks.
//! - **Bounded capacity**: a single ring buffer stores recent events for
//!   all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip
//!   `n` oldest items.
//! - **No persistence**: events are dropped if there are no receivers at
//!   send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for canonical events.
///
/// Multiple publishers can publish concurrently; receivers observe clones
/// of each event. Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped; this function still
    /// returns immediately.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver observing subsequent events.
    ///
    /// A receiver only gets events sent **after** it subscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
