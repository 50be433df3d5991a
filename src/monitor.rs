//! # Process resource monitoring boundary.
//!
//! Sampling CPU/memory is external to the orchestration core; the pool only
//! starts the monitor alongside its own lifecycle and stops it in
//! `shutdown()`. [`ResourceMonitor`] is the seam; [`IntervalMonitor`] runs
//! an injected sampling closure on a fixed interval and retains the latest
//! sample; [`NoopMonitor`] is for tests and embedders that sample
//! elsewhere.

use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One resource sample.
#[derive(Debug, Clone)]
pub struct ProcessSample {
    /// When the sample was taken.
    pub at: SystemTime,
    /// CPU usage in percent.
    pub cpu_percent: f64,
    /// Resident memory in bytes.
    pub rss_bytes: u64,
}

/// Start/stop surface the pool drives.
pub trait ResourceMonitor: Send + Sync + 'static {
    /// Begins sampling. Idempotent.
    fn start(&self);
    /// Stops sampling. Idempotent.
    fn stop(&self);
}

/// Monitor that never samples.
pub struct NoopMonitor;

impl ResourceMonitor for NoopMonitor {
    fn start(&self) {}
    fn stop(&self) {}
}

/// Sampling function injected into [`IntervalMonitor`].
pub type Sampler = dyn Fn() -> ProcessSample + Send + Sync;

/// Periodic monitor retaining the most recent sample.
pub struct IntervalMonitor {
    interval: Duration,
    sampler: Arc<Sampler>,
    last: Arc<RwLock<Option<ProcessSample>>>,
    token: RwLock<Option<CancellationToken>>,
}

impl IntervalMonitor {
    /// Creates a monitor sampling every `interval` via `sampler`.
    pub fn new(interval: Duration, sampler: Arc<Sampler>) -> Self {
        Self {
            interval,
            sampler,
            last: Arc::new(RwLock::new(None)),
            token: RwLock::new(None),
        }
    }

    /// Returns the most recent sample, if any was taken yet.
    pub fn last(&self) -> Option<ProcessSample> {
        self.last.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ResourceMonitor for IntervalMonitor {
    fn start(&self) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return;
        }
        let token = CancellationToken::new();
        *slot = Some(token.clone());

        let interval = self.interval;
        let sampler = Arc::clone(&self.sampler);
        let last = Arc::clone(&self.last);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let sample = sampler();
                        debug!(
                            cpu = sample.cpu_percent,
                            rss = sample.rss_bytes,
                            "process sample"
                        );
                        let mut slot = last.write().unwrap_or_else(|e| e.into_inner());
                        *slot = Some(sample);
                    }
                }
            }
        });
    }

    fn stop(&self) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = slot.take() {
            token.cancel();
        }
    }
}
