//! # Canonical process-wide events.
//!
//! [`EventKind`] enumerates the canonical event catalogue: one entry for
//! each per-job lifecycle signal, plus `StatsChanged` for the independent
//! statistics stream. [`Event`] is the uniform payload every downstream
//! consumer sees: a `kind` discriminant, a job back-reference, and the
//! original signal's payload fields carried through unchanged.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically across all jobs in the process. Use `seq` to restore the
//! exact interleaving when events from different jobs are observed
//! out of order.
//!
//! ## Awaitable kinds
//! Some kinds are *awaitable*: their dispatch can be awaited by the emitter
//! to collect listener outcomes (see [`SignalHub`](crate::events::SignalHub)).
//! All other kinds are fire-and-forget.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::jobs::Job;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Classification of canonical process-wide events.
///
/// Entries mirror the per-job signal catalogue one-for-one, except for
/// [`EventKind::StatsChanged`], which has no per-job lifecycle counterpart
/// (it is derived from the job's statistics collector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The job's engine started executing.
    EngineStarted,
    /// The job's engine finished executing.
    EngineStopped,
    /// The job's engine was paused.
    EnginePaused,
    /// The job's engine resumed after a pause.
    EngineResumed,
    /// The job's spider (execution context) was constructed and opened.
    SpiderOpened,
    /// The spider ran out of queued work.
    SpiderIdle,
    /// A stop was scheduled; teardown is in flight.
    SpiderClosing,
    /// The spider closed; terminal for the job.
    SpiderClosed,
    /// A callback inside the spider raised an error.
    SpiderError,
    /// An item was produced by the job.
    ItemScraped,
    /// An item was discarded by the job.
    ItemDropped,
    /// A page request was scheduled.
    RequestScheduled,
    /// A page request was dropped by the scheduler.
    RequestDropped,
    /// A response reached the spider.
    ResponseReceived,
    /// A response finished downloading.
    ResponseDownloaded,
    /// One of the job's statistics counters changed.
    StatsChanged,
}

impl EventKind {
    /// Returns a short stable label (kebab-case) for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::EngineStarted => "engine-started",
            EventKind::EngineStopped => "engine-stopped",
            EventKind::EnginePaused => "engine-paused",
            EventKind::EngineResumed => "engine-resumed",
            EventKind::SpiderOpened => "spider-opened",
            EventKind::SpiderIdle => "spider-idle",
            EventKind::SpiderClosing => "spider-closing",
            EventKind::SpiderClosed => "spider-closed",
            EventKind::SpiderError => "spider-error",
            EventKind::ItemScraped => "item-scraped",
            EventKind::ItemDropped => "item-dropped",
            EventKind::RequestScheduled => "request-scheduled",
            EventKind::RequestDropped => "request-dropped",
            EventKind::ResponseReceived => "response-received",
            EventKind::ResponseDownloaded => "response-downloaded",
            EventKind::StatsChanged => "stats-changed",
        }
    }

    /// True if dispatch of this kind can be awaited by the emitter.
    ///
    /// Awaitable dispatch collects listener completion/failure; everything
    /// else is fire-and-forget with listener errors caught and logged.
    pub fn is_awaitable(&self) -> bool {
        matches!(
            self,
            EventKind::EngineStarted
                | EventKind::EngineStopped
                | EventKind::SpiderOpened
                | EventKind::SpiderClosed
                | EventKind::ItemScraped
                | EventKind::ItemDropped
        )
    }
}

/// Canonical event with a job back-reference and optional payload fields.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - `job`: the originating job, captured at subscription time
/// - payload fields are set depending on the [`EventKind`]
#[derive(Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Back-reference to the originating job.
    pub job: Arc<Job>,

    /// Human-readable reason (close reason, error message, drop cause).
    pub reason: Option<Arc<str>>,
    /// URL associated with request/response events.
    pub url: Option<Arc<str>>,
    /// HTTP status code for response events.
    pub status: Option<u16>,
    /// Payload size in bytes for download events.
    pub bytes: Option<u64>,
    /// Statistics counter key for `StatsChanged`.
    pub stat_key: Option<Arc<str>>,
    /// Statistics counter value for `StatsChanged`.
    pub stat_value: Option<i64>,
}

impl Event {
    /// Creates a new event of the given kind for the given job, with the
    /// current timestamp and the next global sequence number.
    pub fn new(kind: EventKind, job: Arc<Job>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            job,
            reason: None,
            url: None,
            status: None,
            bytes: None,
            stat_key: None,
            stat_value: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a URL.
    #[inline]
    pub fn with_url(mut self, url: impl Into<Arc<str>>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Attaches an HTTP status code.
    #[inline]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches a payload size.
    #[inline]
    pub fn with_bytes(mut self, bytes: u64) -> Self {
        self.bytes = Some(bytes);
        self
    }

    /// Attaches a statistics counter change.
    #[inline]
    pub fn with_stat(mut self, key: impl Into<Arc<str>>, value: i64) -> Self {
        self.stat_key = Some(key.into());
        self.stat_value = Some(value);
        self
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("seq", &self.seq)
            .field("kind", &self.kind)
            .field("job", &self.job.id())
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}
