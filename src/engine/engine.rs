//! # Crawl engine interface boundary.
//!
//! The actual fetching, request scheduling, parsing and item pipelines are
//! external to this crate. [`Engine`] is the seam: one instance drives one
//! job, emits its per-job [`JobSignal`] stream, and accepts cooperative
//! stop/pause/resume requests. [`EngineFactory`] constructs an engine for a
//! freshly registered job.
//!
//! ## Contract
//! - `start` is non-blocking submission: the engine proceeds on its own and
//!   may suspend at I/O boundaries, fully opaque to the pool.
//! - `stop`/`pause`/`resume` are requests, not synchronous transitions; the
//!   effect is observed later through signals and status queries.
//! - The signal stream is how the engine reports every transition,
//!   including those it initiates itself (e.g. closing when the frontier is
//!   exhausted).
//! - `stats_changes` is an optional capability: engines without an evented
//!   stats collector return `None` and still work, minus the
//!   `stats-changed` canonical stream.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::engine::{JobSignal, StatsChange};
use crate::jobs::{CrawlSpec, Job};

/// One job's crawl engine: signal source plus control surface.
pub trait Engine: Send + Sync + 'static {
    /// Creates a new receiver for this job's lifecycle signal stream.
    fn signals(&self) -> broadcast::Receiver<JobSignal>;

    /// Creates a new receiver for the stats-change stream, if the engine
    /// exposes one (capability presence, not type).
    fn stats_changes(&self) -> Option<broadcast::Receiver<StatsChange>> {
        None
    }

    /// Begins executing the crawl. Returns immediately; the engine runs
    /// until it finishes or is told to stop, honoring `ctx` for
    /// process-wide cancellation.
    fn start(&self, ctx: CancellationToken);

    /// Schedules shutdown (cooperative). Teardown is asynchronous and may
    /// emit further signals (`spider-closing` before the final
    /// `spider-closed`).
    fn stop(&self);

    /// Requests a pause of the engine's execution.
    fn pause(&self);

    /// Requests a resume after a pause.
    fn resume(&self);
}

/// Constructs engines for newly created jobs.
pub trait EngineFactory: Send + Sync + 'static {
    /// Builds the engine for `job`, configured from `spec`.
    ///
    /// The job's id is already assigned and its stats collector already
    /// exists; the engine is expected to mutate `job.stats()` as it runs.
    fn build(&self, spec: &CrawlSpec, job: &Arc<Job>) -> Arc<dyn Engine>;
}
