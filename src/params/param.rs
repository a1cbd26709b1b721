//! # Configuration functions.
//!
//! A [`Param`] is an ordered transform over [`StationConfig`]. Params are
//! applied at registration (`Director::with`) and, as a late override pass,
//! to every station at start (`Director::begin`). Because the same param may
//! be applied to many stations, it is a shared `Fn`, and the values it
//! captures are cloned into each configuration.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use stationmaster::{args, params, StationConfig};
//!
//! let mut cfg = StationConfig::default();
//! for p in [
//!     params::id("poller"),
//!     params::args(args![0u64]),
//!     params::infinite(),
//!     params::delay(Duration::from_millis(500)),
//!     params::next(["parser"]),
//! ] {
//!     p.apply(&mut cfg);
//! }
//! assert_eq!(cfg.explicit_id(), Some("poller"));
//! assert_eq!(cfg.repeat, -1);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::params::{BackoffPolicy, DelayRule, EventSource, Iteration, StationConfig};
use crate::workers::Value;

/// Ordered, reusable transform over a [`StationConfig`].
#[derive(Clone)]
pub struct Param(Arc<dyn Fn(&mut StationConfig) + Send + Sync>);

impl Param {
    /// Wraps an arbitrary transform.
    pub fn new(f: impl Fn(&mut StationConfig) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Applies the transform.
    pub fn apply(&self, cfg: &mut StationConfig) {
        (self.0)(cfg)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Param")
    }
}

/// Fixes the station name. A random UUID is generated when unset.
pub fn id(id: impl Into<String>) -> Param {
    let id = id.into();
    Param::new(move |cfg| cfg.id = Some(id.clone()))
}

/// Sets the arguments of the first loop iteration and of every ticker fire.
pub fn args(values: Vec<Value>) -> Param {
    Param::new(move |cfg| cfg.args = values.clone())
}

/// Sets the loop bound. Negative values loop forever; `0` (default) never runs the loop.
pub fn repeat(n: i64) -> Param {
    Param::new(move |cfg| cfg.repeat = n)
}

/// Shorthand for `repeat(-1)`.
pub fn infinite() -> Param {
    repeat(-1)
}

/// Constant delay between loop iterations.
pub fn delay(duration: Duration) -> Param {
    delay_fn(move |_| duration)
}

/// Computed delay between loop iterations.
pub fn delay_fn(rule: impl Fn(&Iteration) -> Duration + Send + Sync + 'static) -> Param {
    let rule: DelayRule = Arc::new(rule);
    Param::new(move |cfg| cfg.delay = Some(Arc::clone(&rule)))
}

/// Backoff-shaped delay between loop iterations.
pub fn delay_backoff(policy: BackoffPolicy) -> Param {
    let rule = policy.into_rule();
    Param::new(move |cfg| cfg.delay = Some(Arc::clone(&rule)))
}

/// Adds a ticker period.
///
/// Periods are independent: `every(1s)` and `every(2s)` fire the worker once
/// per second plus once every two seconds.
pub fn every(period: Duration) -> Param {
    Param::new(move |cfg| cfg.tickers.push(period))
}

/// Adds event sources; the worker runs once per received value.
pub fn listen(sources: impl IntoIterator<Item = EventSource>) -> Param {
    let sources: Vec<EventSource> = sources.into_iter().collect();
    Param::new(move |cfg| cfg.sources.extend(sources.iter().cloned()))
}

/// Appends downstream stations that receive this station's results.
pub fn next<I, S>(ids: I) -> Param
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
    Param::new(move |cfg| cfg.next.extend(ids.iter().cloned()))
}

/// Sends every failure to `sink`.
pub fn notify_errors(sink: mpsc::Sender<WorkerError>) -> Param {
    Param::new(move |cfg| cfg.policy.notify = Some(sink.clone()))
}

/// Keeps the strand running after failures when `ignore` is true.
pub fn ignore_errors(ignore: bool) -> Param {
    Param::new(move |cfg| cfg.policy.halt_on_error = !ignore)
}

/// Escalates failures to a fatal condition when `fatal` is true.
pub fn fatal_on_error(fatal: bool) -> Param {
    Param::new(move |cfg| cfg.policy.fatal_on_error = fatal)
}

/// Overrides the cancellation scope passed to invocations.
pub fn scope(token: CancellationToken) -> Param {
    Param::new(move |cfg| cfg.scope = token.clone())
}

/// Makes the engine stop starting new iterations once the scope is cancelled.
pub fn stop_on_cancel(stop: bool) -> Param {
    Param::new(move |cfg| cfg.stop_on_cancel = stop)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(params: &[Param]) -> StationConfig {
        let mut cfg = StationConfig::default();
        for p in params {
            p.apply(&mut cfg);
        }
        cfg
    }

    #[test]
    fn defaults_match_documentation() {
        let cfg = StationConfig::default();
        assert_eq!(cfg.repeat, 0);
        assert!(cfg.policy.halt_on_error);
        assert!(!cfg.policy.fatal_on_error);
        assert!(!cfg.notifies());
        assert!(cfg.delay.is_none());
        assert!(cfg.tickers.is_empty() && cfg.sources.is_empty() && cfg.next.is_empty());
        assert!(!cfg.scope.is_cancelled());
        assert!(!cfg.stop_on_cancel);
        assert_eq!(cfg.explicit_id(), None);
    }

    #[test]
    fn later_params_win_and_lists_accumulate() {
        let cfg = build(&[
            repeat(3),
            infinite(),
            every(Duration::from_secs(1)),
            every(Duration::from_secs(2)),
            next(["a"]),
            next(["b", "c"]),
            ignore_errors(true),
        ]);
        assert_eq!(cfg.repeat, -1);
        assert_eq!(cfg.tickers, vec![Duration::from_secs(1), Duration::from_secs(2)]);
        assert_eq!(cfg.next, vec!["a", "b", "c"]);
        assert!(!cfg.policy.halt_on_error);
    }

    #[test]
    fn empty_id_is_not_explicit() {
        let cfg = build(&[id("")]);
        assert_eq!(cfg.explicit_id(), None);
    }

    #[test]
    fn notify_enables_policy() {
        let (tx, _rx) = mpsc::channel(1);
        let cfg = build(&[notify_errors(tx)]);
        assert!(cfg.notifies());
    }

    #[test]
    fn param_is_reusable_across_configs() {
        let p = listen([EventSource::unbounded().1]);
        let a = build(&[p.clone()]);
        let b = build(&[p]);
        assert_eq!(a.sources.len(), 1);
        assert_eq!(b.sources.len(), 1);
    }
}
