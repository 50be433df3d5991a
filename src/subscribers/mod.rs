//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out that drives registered handlers from per-subscriber queues.
//!
//! ```text
//! Event flow:
//!   mapper ── publish ──► SignalHub ──► SubscriberSet ──► on_event() per subscriber
//!                              │
//!                              └─────► Bus (ordered stream for observers)
//! ```
//!
//! Implementing a custom subscriber:
//! ```rust
//! use async_trait::async_trait;
//! use crawlvisor::{Event, EventKind, ListenerError, Subscribe};
//!
//! struct ItemCounter;
//!
//! #[async_trait]
//! impl Subscribe for ItemCounter {
//!     async fn on_event(&self, event: &Event) -> Result<(), ListenerError> {
//!         if event.kind == EventKind::ItemScraped {
//!             // count it...
//!         }
//!         Ok(())
//!     }
//!     fn name(&self) -> &'static str { "item-counter" }
//! }
//! ```

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
