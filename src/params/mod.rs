//! Station configuration and the functions that build it.
//!
//! ## Contents
//! - [`StationConfig`], [`ErrorPolicy`] the configuration bundle and its defaults
//! - [`Param`] and the constructor functions ([`repeat`], [`every`], [`listen`], [`next`], ...)
//! - [`DelayRule`], [`Iteration`], [`BackoffPolicy`], [`JitterPolicy`] loop pacing
//! - [`EventSource`] inbound channels for event strands
//!
//! ## Quick wiring
//! ```text
//! Director::with(worker, [Param...])
//!      └─► StationConfig::default() ─► p1.apply ─► p2.apply ─► ... ─► Station
//! Director::begin([Param...])
//!      └─► every Station: override.apply ─► frozen in the runtime view
//! ```

mod config;
mod delay;
mod param;
mod source;

pub use config::{ErrorPolicy, StationConfig};
pub use delay::{BackoffPolicy, DelayRule, Iteration, JitterPolicy};
pub use param::{
    Param, args, delay, delay_backoff, delay_fn, every, fatal_on_error, id, ignore_errors,
    infinite, listen, next, notify_errors, repeat, scope, stop_on_cancel,
};
pub use source::EventSource;
