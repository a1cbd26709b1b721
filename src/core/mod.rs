//! Core orchestration: the director, its stations, and the started runtime.
//!
//! - [`Director`] registry and lifecycle (`with`, `begin`, `wait`, `wait_all`, `shutdown`)
//! - [`DirectorBuilder`] configuration, subscribers and identifier generator
//! - [`Trigger`] which strand produced an invocation
//!
//! Internal:
//! - `station` a worker, its configuration and its completion counters
//! - `runtime` strands, the invocation choke point, cascades and fatal escalation

mod builder;
mod director;
mod runtime;
mod station;

pub use builder::{DirectorBuilder, IdGenerator};
pub use director::Director;
pub use station::Trigger;
