//! # External crawl-engine boundary.
//!
//! This module holds everything the pool needs to know about the crawl
//! engine it orchestrates, and nothing more:
//! - [`Engine`] / [`EngineFactory`] — the injected execution seam
//! - [`JobSignal`], [`JobSignalKind`] — the per-job signal catalogue
//! - [`StatsCollector`], [`StatsChange`] — per-job counters and their
//!   independent change stream

mod engine;
mod signal;
mod stats;

pub use engine::{Engine, EngineFactory};
pub use signal::{JobSignal, JobSignalKind};
pub use stats::{StatsChange, StatsCollector};
