//! # Worker abstractions.
//!
//! This module provides the unit-of-work types driven by the director:
//! - [`Worker`] - trait for implementing async cancelable workers
//! - [`WorkerFn`] - closure-backed worker implementation
//! - [`WorkerRef`] - shared reference to a worker (`Arc<dyn Worker>`)
//! - [`Value`] - untyped argument/result value passed between invocations

mod value;
mod worker;
mod worker_fn;

pub use value::Value;
pub use worker::{Worker, WorkerRef};
pub use worker_fn::WorkerFn;
