//! # Station configuration.
//!
//! [`StationConfig`] is the plain configuration bundle attached to a worker
//! at registration. Its [`Default`] impl is the single source of the
//! documented defaults; [`Param`](crate::params::Param)s are applied over it
//! in order.
//!
//! ## Defaults
//! - `repeat = 0` → the loop body never runs
//! - `policy.halt_on_error = true`, no notify target, no fatal escalation
//! - no delay, no tickers, no event sources, no downstream stations
//! - `scope` = a fresh token that nobody cancels
//! - `stop_on_cancel = false` → the engine ignores `scope` cancellation

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::params::{DelayRule, EventSource};
use crate::workers::Value;

/// What happens after a failing invocation.
#[derive(Clone, Debug)]
pub struct ErrorPolicy {
    /// Where failures are sent; notifying is enabled exactly when this is set.
    ///
    /// Sending awaits channel capacity, so an unread channel stalls the strand.
    pub notify: Option<mpsc::Sender<WorkerError>>,
    /// Stop the strand that observed the failure.
    pub halt_on_error: bool,
    /// Escalate the failure to a fatal condition (see [`FatalPolicy`](crate::FatalPolicy)).
    pub fatal_on_error: bool,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self {
            notify: None,
            halt_on_error: true,
            fatal_on_error: false,
        }
    }
}

/// Trigger and policy settings of one station.
#[derive(Clone)]
pub struct StationConfig {
    /// Explicit identifier; `None` (or empty) lets the director generate one.
    pub id: Option<String>,
    /// Arguments of the first loop iteration and of every ticker fire.
    pub args: Vec<Value>,
    /// Loop bound: `n < 0` infinite, `0` never, `n > 0` exactly `n` iterations.
    pub repeat: i64,
    /// Wait before the next loop iteration.
    pub delay: Option<DelayRule>,
    /// One independent ticker strand per period.
    pub tickers: Vec<Duration>,
    /// One independent event strand per source.
    pub sources: Vec<EventSource>,
    /// Downstream station identifiers, in dispatch order.
    pub next: Vec<String>,
    /// Failure handling.
    pub policy: ErrorPolicy,
    /// Parent of the token passed to every invocation.
    pub scope: CancellationToken,
    /// Stop spawning new iterations once `scope` is cancelled.
    pub stop_on_cancel: bool,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            id: None,
            args: Vec::new(),
            repeat: 0,
            delay: None,
            tickers: Vec::new(),
            sources: Vec::new(),
            next: Vec::new(),
            policy: ErrorPolicy::default(),
            scope: CancellationToken::new(),
            stop_on_cancel: false,
        }
    }
}

impl StationConfig {
    /// Returns the explicit identifier if it is set and non-empty.
    #[inline]
    pub fn explicit_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns true if a notify target is configured.
    #[inline]
    pub fn notifies(&self) -> bool {
        self.policy.notify.is_some()
    }
}
