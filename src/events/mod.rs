//! Canonical events: types, taxonomy table, broadcast bus, and hub.
//!
//! This module groups the event **data model** and the delivery machinery
//! used to publish/subscribe to canonical events derived from per-job
//! signals.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — event classification and payload
//! - [`SignalTable`] — static bidirectional per-job ↔ canonical mapping
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//! - [`SignalHub`] — stream + subscriber fan-out with awaitable dispatch
//!
//! ## Quick reference
//! - **Publishers**: the signal mapper (per-job listener tasks) and the
//!   pool itself.
//! - **Consumers**: the pool's lifecycle listener, registered
//!   [`Subscribe`](crate::subscribers::Subscribe) implementations, and any
//!   number of stream receivers.

mod bus;
mod event;
mod hub;
mod table;

pub use bus::Bus;
pub use event::{Event, EventKind};
pub use hub::SignalHub;
pub use table::SignalTable;
