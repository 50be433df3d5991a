//! # Per-job signal catalogue.
//!
//! A single crawl job exposes a fixed catalogue of lifecycle signals,
//! enumerated by [`JobSignalKind`]. [`JobSignal`] is the payload an engine
//! emits on its own stream; the mapper translates it into a canonical
//! [`Event`](crate::events::Event), replacing the emitter identity with the
//! job back-reference and carrying the payload fields through unchanged.
//!
//! `EnginePaused`, `EngineResumed` and `SpiderClosing` extend the base
//! engine catalogue: they announce orchestration-visible transitions
//! (pause/resume acknowledged, stop scheduled) that a plain engine does not
//! report on its own.

use std::sync::Arc;

/// Classification of signals a single job's engine can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobSignalKind {
    /// The engine started executing.
    EngineStarted,
    /// The engine finished executing.
    EngineStopped,
    /// The engine acknowledged a pause.
    EnginePaused,
    /// The engine acknowledged a resume.
    EngineResumed,
    /// The spider (execution context) was constructed and opened.
    SpiderOpened,
    /// The spider ran out of queued work.
    SpiderIdle,
    /// A stop was scheduled; teardown is in flight.
    SpiderClosing,
    /// The spider closed; terminal for the job.
    SpiderClosed,
    /// A spider callback raised an error.
    SpiderError,
    /// An item was produced.
    ItemScraped,
    /// An item was discarded.
    ItemDropped,
    /// A page request was scheduled.
    RequestScheduled,
    /// A page request was dropped.
    RequestDropped,
    /// A response reached the spider.
    ResponseReceived,
    /// A response finished downloading.
    ResponseDownloaded,
}

/// A signal emitted by one job's engine, with optional payload fields.
#[derive(Debug, Clone)]
pub struct JobSignal {
    /// Signal classification.
    pub kind: JobSignalKind,
    /// Human-readable reason (close reason, error message, drop cause).
    pub reason: Option<Arc<str>>,
    /// URL associated with request/response signals.
    pub url: Option<Arc<str>>,
    /// HTTP status code for response signals.
    pub status: Option<u16>,
    /// Payload size in bytes for download signals.
    pub bytes: Option<u64>,
}

impl JobSignal {
    /// Creates a new signal of the given kind with no payload.
    pub fn new(kind: JobSignalKind) -> Self {
        Self {
            kind,
            reason: None,
            url: None,
            status: None,
            bytes: None,
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
}
