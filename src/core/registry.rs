//! # Active job registry.
//!
//! The registry owns one [`JobHandle`] per active job: the job itself, its
//! engine, and the cancellation token scoping its mapper tasks. Keyed by
//! [`JobId`] in a `HashMap`, so two handles for one id are structurally
//! impossible — `lookup` never has to resolve "multiple matches".
//!
//! ## Rules
//! - Jobs enter at creation time (`register`) and leave exactly once, from
//!   the pool's close listener (`remove`).
//! - `lookup` on an unknown id fails with [`PoolError::NotFound`], never an
//!   empty default.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::engine::Engine;
use crate::error::PoolError;
use crate::jobs::{Job, JobId};

/// Handle to one active job.
pub struct JobHandle {
    /// The job's identity and published state.
    pub job: Arc<Job>,
    /// The engine driving this job.
    pub engine: Arc<dyn Engine>,
    /// Cancellation token for the job's mapper tasks (child of the pool's
    /// runtime token).
    pub cancel: CancellationToken,
}

/// Set of jobs currently known to the process.
pub struct Registry {
    jobs: RwLock<HashMap<JobId, Arc<JobHandle>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Adds a job at creation time, after id allocation.
    pub async fn register(&self, handle: Arc<JobHandle>) {
        let mut jobs = self.jobs.write().await;
        jobs.insert(handle.job.id(), handle);
    }

    /// Returns the unique active handle for `id`.
    pub async fn lookup(&self, id: JobId) -> Result<Arc<JobHandle>, PoolError> {
        let jobs = self.jobs.read().await;
        jobs.get(&id).cloned().ok_or(PoolError::NotFound { id })
    }

    /// Removes and returns the handle for `id`, if present.
    pub async fn remove(&self, id: JobId) -> Option<Arc<JobHandle>> {
        let mut jobs = self.jobs.write().await;
        jobs.remove(&id)
    }

    /// Returns all active handles, ordered by ascending id.
    pub async fn list(&self) -> Vec<Arc<JobHandle>> {
        let jobs = self.jobs.read().await;
        let mut handles: Vec<_> = jobs.values().cloned().collect();
        handles.sort_by_key(|h| h.job.id());
        handles
    }

    /// Number of active jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// True if no jobs are active.
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
