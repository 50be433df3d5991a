//! Error types used by the crawlvisor pool and event dispatch.
//!
//! This module defines two main error types:
//!
//! - [`PoolError`] — errors raised by the pool's public operations and by
//!   awaitable event dispatch.
//! - [`ListenerError`] — a failure reported by a single event subscriber.
//!
//! [`PoolError`] provides [`PoolError::as_label`] for logging/metrics.

use thiserror::Error;

use crate::jobs::JobId;

/// A failure reported by a single event subscriber.
///
/// Carries the subscriber's name and a human-readable message. Listener
/// failures are isolated: they are collected (awaitable dispatch) or logged
/// (fire-and-forget dispatch), never propagated into the emitting job.
#[derive(Error, Debug, Clone)]
#[error("subscriber '{subscriber}' failed: {message}")]
pub struct ListenerError {
    /// Name of the failing subscriber.
    pub subscriber: &'static str,
    /// Failure message.
    pub message: String,
}

impl ListenerError {
    /// Creates a listener error for the named subscriber.
    pub fn new(subscriber: &'static str, message: impl Into<String>) -> Self {
        Self {
            subscriber,
            message: message.into(),
        }
    }
}

/// # Errors produced by the crawl job pool.
///
/// These cover the public operation contracts (`NotFound`, `NotPaused`),
/// the archive's duplicate guard, and failures reported back from awaitable
/// event dispatch.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PoolError {
    /// Operation referenced a job id that is not in the active registry.
    #[error("job is not known: {id}")]
    NotFound {
        /// The unknown job id.
        id: JobId,
    },

    /// `resume` was called for a job id that is not in the suspended set.
    ///
    /// Guards against double-resume bugs: removing a missing id must fail
    /// loudly, never silently no-op.
    #[error("job {id} is not paused")]
    NotPaused {
        /// The non-suspended job id.
        id: JobId,
    },

    /// The archive was asked to record the same job id twice.
    ///
    /// Resolved by ignoring the second attempt; the close listener logs it
    /// at debug level. Never fatal.
    #[error("job {id} already has a finished record")]
    DuplicateRecord {
        /// The already-recorded job id.
        id: JobId,
    },

    /// One or more subscribers failed while an awaitable event was dispatched.
    ///
    /// Reported to whichever caller awaited that dispatch; other listeners
    /// and the emitting job are unaffected.
    #[error("event '{event}' had {} failed listener(s)", failures.len())]
    ListenerFailure {
        /// Stable label of the dispatched event kind.
        event: &'static str,
        /// The individual subscriber failures.
        failures: Vec<ListenerError>,
    },
}

impl PoolError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use crawlvisor::{JobId, PoolError};
    ///
    /// let err = PoolError::NotPaused { id: JobId(3) };
    /// assert_eq!(err.as_label(), "pool_not_paused");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PoolError::NotFound { .. } => "pool_not_found",
            PoolError::NotPaused { .. } => "pool_not_paused",
            PoolError::DuplicateRecord { .. } => "pool_duplicate_record",
            PoolError::ListenerFailure { .. } => "pool_listener_failure",
        }
    }
}
