//! Worker decorators.
//!
//! Decorators wrap any [`Worker`](crate::Worker) and are themselves workers,
//! so they stack: `Status::new(Deadline::new(worker, timeout))`.
//!
//! - [`Status`] in-flight gauge and completion counter
//! - [`Deadline`] fixed maximum duration per invocation

mod deadline;
mod status;

pub use deadline::Deadline;
pub use status::Status;
