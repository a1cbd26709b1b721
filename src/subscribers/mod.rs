//! # Event subscribers.
//!
//! Subscribers observe runtime [`Event`](crate::Event)s without slowing
//! down the strands that publish them.
//!
//! ```text
//! Bus ──► director listener ──► SubscriberSet ──► [queue] ──► worker ──► Subscribe::on_event
//! ```
//!
//! - [`Subscribe`]: the extension trait
//! - [`SubscriberSet`]: per-subscriber bounded queues and workers
//! - `LogWriter` (feature `logging`): renders events through `tracing`

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
