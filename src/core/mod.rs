//! # Orchestration core.
//!
//! The pieces the [`CrawlerPool`] is assembled from:
//!
//! - `ids` — monotonic job id allocation
//! - `registry` — the active [`JobHandle`] map
//! - `mapper` — per-job signal streams folded into the canonical taxonomy
//! - `pool` — the public orchestrator and its internal close listener

mod ids;
mod mapper;
mod pool;
mod registry;

pub use ids::IdAllocator;
pub use pool::{CrawlerPool, CrawlerPoolBuilder};
pub use registry::{JobHandle, Registry};
