//! # stationmaster
//!
//! **Stationmaster** is an embeddable engine that runs async workers as
//! *stations*, each driven by up to three kinds of triggers, and chains
//! stations into fan-out pipelines.
//!
//! A station is a [`Worker`] plus a configuration built from [`params`]. Once
//! the [`Director`] begins, every station runs:
//! - one **loop** strand, repeating the worker `repeat` times (or forever),
//!   feeding each invocation's results into the next one;
//! - one **ticker** strand per period, invoking the worker with its initial args;
//! - one **event** strand per [`EventSource`], invoking the worker with each received value.
//!
//! After a successful invocation (or a failure the station does not halt on),
//! its results are dispatched as detached **cascade** invocations to every
//! downstream station named with [`params::next`].
//!
//! ## Architecture
//! ```text
//!   with(worker, [params]) ×N
//!            │
//!            ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Director                                                         │
//! │  - Building: mutable registry, subscribers                        │
//! │  - Started:  Arc<Runtime> (read-only registry, cascade tracker)   │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   ┌──────────┐       ┌──────────┐       ┌──────────┐
//!   │ Station  │       │ Station  │       │ Station  │
//!   │ loop     │       │ tickers  │       │ events   │   strands (tracked per station)
//!   └────┬─────┘       └────┬─────┘       └────┬─────┘
//!        └──────────────────┼──────────────────┘
//!                           ▼
//!                   Runtime::exec(station, args)
//!                    ├─ failure policy: notify ─► fatal ─► halt
//!                    └─ cascades ─► Runtime::exec(next, results)   (runtime tracker)
//!                           │
//!                           ▼  publishes
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                    director listener ─► SubscriberSet ─► Subscribe::on_event
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------------|---------------------------------------------|
//! | **Orchestration** | Register stations, start them, wait, shut down.                 | [`Director`], [`DirectorBuilder`]           |
//! | **Workers**       | Async units of work over untyped values.                        | [`Worker`], [`WorkerFn`], [`Value`]         |
//! | **Parameters**    | Loops, delays, tickers, event sources, cascades, error policy.  | [`params`], [`StationConfig`], [`Param`]    |
//! | **Decorators**    | Invocation counters and per-invocation deadlines.               | [`Status`], [`Deadline`]                    |
//! | **Subscriber API**| Hook into runtime events (logging, metrics, custom subscribers).| [`Subscribe`], [`Event`]                    |
//! | **Errors**        | Typed errors for orchestration and worker invocations.          | [`DirectorError`], [`WorkerError`]          |
//! | **Configuration** | Event bus capacity and fatal escalation policy.                 | [`DirectorConfig`], [`FatalPolicy`]         |
//!
//! ## Optional features
//! - `logging`: exports a built-in `LogWriter` subscriber rendering events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use stationmaster::{args, params, Director, DirectorConfig, EventSource, Value, WorkerError, WorkerFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let subs: Vec<Arc<dyn stationmaster::Subscribe>> = Vec::new();
//!     let director = Director::builder(DirectorConfig::default())
//!         .with_subscribers(subs)
//!         .build();
//!
//!     let (tx, source) = EventSource::channel(16);
//!     let upper = WorkerFn::arc(|_ctx: CancellationToken, args: Vec<Value>| async move {
//!         let word = args.first().and_then(|v| v.get::<String>()).unwrap_or_default();
//!         Ok::<_, WorkerError>(args![word.to_uppercase()])
//!     });
//!     let print = WorkerFn::arc(|_ctx: CancellationToken, args: Vec<Value>| async move {
//!         if let Some(word) = args.first().and_then(|v| v.get::<String>()) {
//!             println!("{word}");
//!         }
//!         Ok::<_, WorkerError>(Vec::new())
//!     });
//!
//!     director
//!         .with(upper, [params::id("upper"), params::listen([source]), params::next(["print"])])?
//!         .with(print, [params::id("print")])?;
//!     director.begin([]).await?;
//!
//!     tx.send(Value::new("hello".to_string())).await?;
//!     drop(tx);
//!
//!     director.wait_all().await?;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod decorators;
mod error;
mod events;
mod subscribers;
mod workers;

pub mod params;

// ---- Public re-exports ----

pub use config::{DirectorConfig, FatalPolicy};
pub use core::{Director, DirectorBuilder, IdGenerator, Trigger};
pub use decorators::{Deadline, Status};
pub use error::{DirectorError, WorkerError};
pub use events::{Bus, Event, EventKind};
pub use params::{
    BackoffPolicy, DelayRule, ErrorPolicy, EventSource, Iteration, JitterPolicy, Param,
    StationConfig,
};
pub use subscribers::{Subscribe, SubscriberSet};
pub use workers::{Value, Worker, WorkerFn, WorkerRef};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
