//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] emits every canonical event as a `tracing` record keyed by
//! job id. Enabled via the `logging` feature. Not intended for production —
//! implement a custom [`Subscribe`] for real observability pipelines.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::ListenerError;
use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Demo subscriber logging canonical events through `tracing`.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) -> Result<(), ListenerError> {
        let id = e.job.id();
        match e.kind {
            EventKind::SpiderClosed => {
                info!(job = %id, reason = ?e.reason, "spider closed");
            }
            EventKind::SpiderError => {
                info!(job = %id, error = ?e.reason, "spider error");
            }
            EventKind::EngineStarted
            | EventKind::EngineStopped
            | EventKind::EnginePaused
            | EventKind::EngineResumed
            | EventKind::SpiderOpened
            | EventKind::SpiderClosing => {
                info!(job = %id, event = e.kind.as_label(), "job lifecycle");
            }
            EventKind::StatsChanged => {
                debug!(
                    job = %id,
                    key = ?e.stat_key,
                    value = ?e.stat_value,
                    "stats changed"
                );
            }
            _ => {
                debug!(job = %id, event = e.kind.as_label(), url = ?e.url, "job event");
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
