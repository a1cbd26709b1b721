//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the director, the trigger strands,
//! the cascade executor and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Director` (registration, start, shutdown), `Runtime`
//!   (strands, invocation failures, cascades, fatal escalation),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the director's listener, which fans out to `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
