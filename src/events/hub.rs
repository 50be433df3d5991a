//! # SignalHub: the process-wide event primitive.
//!
//! Combines the two delivery mechanisms every canonical [`Event`] goes
//! through:
//!
//! - the [`Bus`] broadcast stream, for passive observers (UI panels,
//!   queriers) that want the ordered event feed;
//! - the [`SubscriberSet`] fan-out, for registered handlers whose
//!   completion can matter to the emitter.
//!
//! ## Dispatch modes
//! ```text
//! publish(ev)            — fire-and-forget:
//!     Bus.publish(ev)  +  SubscriberSet::emit(&ev)      (queued, errors logged)
//!
//! publish_awaited(ev)    — awaitable:
//!     SubscriberSet::emit_awaited(&ev).await            (failures collected)
//!     Bus.publish(ev)
//! ```
//!
//! For awaitable kinds the listeners complete **before** the event appears
//! on the stream: an observer that sees `spider-closed` on the bus can rely
//! on the finished-job record already existing.

use tokio::sync::broadcast;

use crate::error::PoolError;
use crate::events::{Bus, Event};
use crate::subscribers::SubscriberSet;

/// Process-wide event hub: broadcast stream plus subscriber fan-out.
pub struct SignalHub {
    bus: Bus,
    subs: SubscriberSet,
}

impl SignalHub {
    /// Creates a hub with the given stream capacity and subscriber set.
    pub fn new(bus_capacity: usize, subs: SubscriberSet) -> Self {
        Self {
            bus: Bus::new(bus_capacity),
            subs,
        }
    }

    /// Creates a new receiver for the ordered canonical event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Fire-and-forget dispatch.
    ///
    /// Publishes on the stream and enqueues for every subscriber; listener
    /// errors are caught and logged by the subscriber workers, never
    /// surfaced to the emitter.
    pub fn publish(&self, ev: Event) {
        self.subs.emit(&ev);
        self.bus.publish(ev);
    }

    /// Awaitable dispatch.
    ///
    /// Waits for every subscriber to process the event, then publishes it
    /// on the stream. Returns [`PoolError::ListenerFailure`] carrying the
    /// individual failures, if any; the event still reaches the stream and
    /// the remaining listeners either way.
    pub async fn publish_awaited(&self, ev: Event) -> Result<(), PoolError> {
        let label = ev.kind.as_label();
        let failures = self.subs.emit_awaited(&ev).await;
        self.bus.publish(ev);

        if failures.is_empty() {
            Ok(())
        } else {
            Err(PoolError::ListenerFailure {
                event: label,
                failures,
            })
        }
    }
}
