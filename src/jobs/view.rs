//! # Snapshot view shape.
//!
//! [`JobView`] is the uniform row returned by the pool's query operations:
//! the same shape for an active job (status derived from live state) and a
//! finished one (status is the recorded close reason, stats are the frozen
//! final counters).

use std::collections::HashMap;
use std::sync::Arc;

use crate::jobs::{FinishedJob, Job, JobId, JobStatus};

/// One row of the unified job snapshot.
#[derive(Debug, Clone)]
pub struct JobView {
    /// The job's unique id.
    pub id: JobId,
    /// Caller-supplied opaque identifier, if any.
    pub external_id: Option<Arc<str>>,
    /// The originating seed target.
    pub seed: Arc<str>,
    /// Status label: a derived status for active jobs, the close reason for
    /// finished ones.
    pub status: Arc<str>,
    /// Current (active) or frozen (finished) statistics.
    pub stats: HashMap<String, i64>,
}

impl JobView {
    /// Builds a view row for an active job with its derived status.
    pub fn active(job: &Job, status: JobStatus) -> Self {
        Self {
            id: job.id(),
            external_id: job.external_id().cloned(),
            seed: job.seed().clone(),
            status: Arc::from(status.as_label()),
            stats: job.stats().snapshot(),
        }
    }
}

impl From<&FinishedJob> for JobView {
    fn from(record: &FinishedJob) -> Self {
        Self {
            id: record.id,
            external_id: record.external_id.clone(),
            seed: record.seed.clone(),
            status: record.status.clone(),
            stats: record.stats.clone(),
        }
    }
}
