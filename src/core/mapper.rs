//! # Signal taxonomy mapper.
//!
//! For every job the mapper subscribes once to the engine's lifecycle
//! signal stream and, when the capability is present, to the stats-change
//! stream of the job's statistics collector. Each incoming signal is
//! translated through the static [`SignalTable`] into a canonical
//! [`Event`] and republished on the [`SignalHub`].
//!
//! ## Rules
//! - The job back-reference is captured at subscription time: a signal
//!   arriving after teardown has begun still resolves to a valid job, never
//!   re-derived from possibly-torn-down state.
//! - Payload fields pass through unchanged; only the emitter identity is
//!   replaced by the job back-reference. For stats changes the literal
//!   emitter is the collector, one indirection deeper — the captured job is
//!   its owner.
//! - Awaitable canonical kinds are dispatched awaited; listener failures
//!   are reported to the mapper, which logs them and never lets them reach
//!   the job's own execution. Everything else is fire-and-forget.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::engine::{Engine, JobSignal};
use crate::events::{Event, EventKind, SignalHub, SignalTable};
use crate::jobs::Job;

/// Republishes per-job signals as canonical events.
pub(crate) struct SignalMapper {
    hub: Arc<SignalHub>,
}

impl SignalMapper {
    pub(crate) fn new(hub: Arc<SignalHub>) -> Self {
        Self { hub }
    }

    /// Subscribes to `engine`'s streams on behalf of `job` and spawns the
    /// listener tasks, scoped to `token`.
    pub(crate) fn attach(&self, job: &Arc<Job>, engine: &Arc<dyn Engine>, token: &CancellationToken) {
        self.spawn_lifecycle_listener(job, engine, token);
        self.spawn_stats_listener(job, engine, token);
    }

    /// Lifecycle signals → canonical events, one listener task per job.
    fn spawn_lifecycle_listener(
        &self,
        job: &Arc<Job>,
        engine: &Arc<dyn Engine>,
        token: &CancellationToken,
    ) {
        let mut rx = engine.signals();
        let hub = Arc::clone(&self.hub);
        let job = Arc::clone(job);
        let token = token.clone();

        tokio::spawn(async move {
            loop {
                // Biased toward the stream: signals already queued when the
                // job is torn down (e.g. a re-delivered close) still get
                // translated; cancellation lands once the queue is idle.
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Ok(sig) => dispatch(&hub, canonicalize(sig, Arc::clone(&job))).await,
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(job = %job.id(), skipped, "lifecycle listener lagged");
                            continue;
                        }
                    },
                    _ = token.cancelled() => break,
                }
            }
        });
    }

    /// Stats changes → `stats-changed` events, only if the engine exposes
    /// the capability.
    fn spawn_stats_listener(
        &self,
        job: &Arc<Job>,
        engine: &Arc<dyn Engine>,
        token: &CancellationToken,
    ) {
        let Some(mut rx) = engine.stats_changes() else {
            return;
        };
        let hub = Arc::clone(&self.hub);
        let job = Arc::clone(job);
        let token = token.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Ok(change) => {
                            let ev = Event::new(EventKind::StatsChanged, Arc::clone(&job))
                                .with_stat(change.key, change.value);
                            hub.publish(ev);
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(job = %job.id(), skipped, "stats listener lagged");
                            continue;
                        }
                    },
                    _ = token.cancelled() => break,
                }
            }
        });
    }
}

/// Builds the canonical event for a per-job signal, carrying the payload
/// fields through unchanged.
fn canonicalize(sig: JobSignal, job: Arc<Job>) -> Event {
    let mut ev = Event::new(SignalTable::canonical(sig.kind), job);
    ev.reason = sig.reason;
    ev.url = sig.url;
    ev.status = sig.status;
    ev.bytes = sig.bytes;
    ev
}

/// Dispatches with the mode the canonical kind requires.
async fn dispatch(hub: &SignalHub, ev: Event) {
    if ev.kind.is_awaitable() {
        let kind = ev.kind;
        let job = ev.job.id();
        if let Err(err) = hub.publish_awaited(ev).await {
            // Listener failures stay on this side of the boundary.
            warn!(job = %job, event = kind.as_label(), error = %err, "awaited dispatch failed");
        }
    } else {
        hub.publish(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::JobSignalKind;
    use crate::jobs::{CrawlSpec, JobId};

    #[test]
    fn test_canonicalize_preserves_payload() {
        let job = Job::new(JobId(4), &CrawlSpec::new("example.com"));
        let sig = JobSignal::new(JobSignalKind::ResponseReceived)
            .with_url("https://example.com/a")
            .with_status(200)
            .with_bytes(2048);

        let ev = canonicalize(sig, job);
        assert_eq!(ev.kind, EventKind::ResponseReceived);
        assert_eq!(ev.job.id(), JobId(4));
        assert_eq!(ev.url.as_deref(), Some("https://example.com/a"));
        assert_eq!(ev.status, Some(200));
        assert_eq!(ev.bytes, Some(2048));
    }
}
