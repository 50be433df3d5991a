//! # SubscriberSet: fan-out over multiple subscribers.
//!
//! [`SubscriberSet`] distributes each [`Event`] to every subscriber through
//! a per-subscriber bounded queue with a dedicated worker, so one slow
//! subscriber never delays another.
//!
//! ## Delivery modes
//! - [`SubscriberSet::emit`] — non-blocking: enqueues and returns. On a
//!   full or closed queue the event is dropped for that subscriber (warn).
//! - [`SubscriberSet::emit_awaited`] — enqueues an acknowledged envelope in
//!   every queue (waiting for space, never dropping), then awaits all
//!   acknowledgements and returns the collected listener failures.
//!
//! ## Guarantees
//! - Per-subscriber FIFO: awaited and fire-and-forget deliveries share one
//!   queue, so a subscriber observes events in publish order.
//! - Panics inside subscribers are caught and reported as listener
//!   failures (isolation).
//!
//! ## Diagram
//! ```text
//!    emit(&Event) / emit_awaited(&Event)
//!        │                         (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_event()
//!        ├────────────────► [queue S2] ─► worker S2 ─► on_event()
//!        └────────────────► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::ListenerError;
use crate::events::Event;

use super::Subscribe;

/// One unit of work for a subscriber worker.
enum Delivery {
    /// Fire-and-forget: failures are logged by the worker.
    Fire(Arc<Event>),
    /// Acknowledged: the outcome is sent back to the awaiting emitter.
    Awaited(Arc<Event>, oneshot::Sender<Result<(), ListenerError>>),
}

/// Per-subscriber channel with metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Delivery>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// `default_capacity` sizes every queue unless the subscriber overrides
    /// it via [`Subscribe::queue_capacity`].
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, default_capacity: usize) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().unwrap_or(default_capacity).max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Delivery>(cap);
            let s = Arc::clone(&sub);

            let handle = tokio::spawn(async move {
                while let Some(delivery) = rx.recv().await {
                    let (ev, ack) = match delivery {
                        Delivery::Fire(ev) => (ev, None),
                        Delivery::Awaited(ev, ack) => (ev, Some(ack)),
                    };

                    let fut = s.on_event(ev.as_ref());
                    let outcome = match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        Ok(res) => res,
                        Err(panic_err) => Err(ListenerError::new(
                            s.name(),
                            format!("panicked: {panic_err:?}"),
                        )),
                    };

                    match ack {
                        Some(ack) => {
                            // The emitter may have stopped waiting; fine.
                            let _ = ack.send(outcome);
                        }
                        None => {
                            if let Err(err) = outcome {
                                warn!(
                                    subscriber = s.name(),
                                    event = ev.kind.as_label(),
                                    error = %err,
                                    "subscriber failed"
                                );
                            }
                        }
                    }
                }
            });

            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }

        Self { channels, workers }
    }

    /// Fans out one event to all subscribers (non-blocking).
    ///
    /// If a subscriber's queue is full or its worker is gone, the event is
    /// dropped for that subscriber and a warning is logged.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            match channel.sender.try_send(Delivery::Fire(Arc::clone(&ev))) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        subscriber = channel.name,
                        event = ev.kind.as_label(),
                        "subscriber dropped event: queue full"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!(
                        subscriber = channel.name,
                        event = ev.kind.as_label(),
                        "subscriber dropped event: worker closed"
                    );
                }
            }
        }
    }

    /// Fans out one event and awaits every subscriber's outcome.
    ///
    /// Waits for queue space instead of dropping, so awaitable events reach
    /// every live subscriber. Returns the collected failures (empty on full
    /// success).
    pub async fn emit_awaited(&self, event: &Event) -> Vec<ListenerError> {
        let ev = Arc::new(event.clone());
        let mut failures = Vec::new();
        let mut pending = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let (ack_tx, ack_rx) = oneshot::channel();
            if channel
                .sender
                .send(Delivery::Awaited(Arc::clone(&ev), ack_tx))
                .await
                .is_err()
            {
                failures.push(ListenerError::new(channel.name, "worker closed"));
                continue;
            }
            pending.push((channel.name, ack_rx));
        }

        for (name, ack_rx) in pending {
            match ack_rx.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => failures.push(err),
                Err(_) => failures.push(ListenerError::new(name, "worker dropped ack")),
            }
        }

        failures
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }
}
