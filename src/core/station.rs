//! # Stations: a worker, its configuration, and its completion counters.
//!
//! A [`Station`] is created when the director starts, from the registered
//! worker and its (overridden) configuration. It owns one task tracker per
//! trigger kind; a strand is counted from spawn to exit, and
//! [`StationSyncs::wait`] resolves once all three are closed and empty.

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::params::StationConfig;
use crate::workers::WorkerRef;

/// Execution path that produced an invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// The bounded/unbounded loop strand.
    Loop,
    /// A periodic ticker strand.
    Ticker,
    /// An event-source strand.
    Event,
    /// A detached downstream invocation.
    Cascade,
}

impl Trigger {
    /// Short stable label for logs/metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Loop => "loop",
            Trigger::Ticker => "ticker",
            Trigger::Event => "event",
            Trigger::Cascade => "cascade",
        }
    }
}

/// Per-station completion counters, one per tracked trigger kind.
pub(crate) struct StationSyncs {
    loops: TaskTracker,
    tickers: TaskTracker,
    events: TaskTracker,
}

impl StationSyncs {
    fn new() -> Self {
        Self {
            loops: TaskTracker::new(),
            tickers: TaskTracker::new(),
            events: TaskTracker::new(),
        }
    }

    /// Tracker counting the strands of `trigger`. Cascades are not tracked per station.
    pub(crate) fn tracker(&self, trigger: Trigger) -> Option<&TaskTracker> {
        match trigger {
            Trigger::Loop => Some(&self.loops),
            Trigger::Ticker => Some(&self.tickers),
            Trigger::Event => Some(&self.events),
            Trigger::Cascade => None,
        }
    }

    /// Marks launching as finished so that `wait` can resolve.
    pub(crate) fn close(&self) {
        self.loops.close();
        self.tickers.close();
        self.events.close();
    }

    /// Number of strands still running.
    pub(crate) fn running(&self) -> usize {
        self.loops.len() + self.tickers.len() + self.events.len()
    }

    /// Waits until every strand has exited.
    pub(crate) async fn wait(&self) {
        self.loops.wait().await;
        self.tickers.wait().await;
        self.events.wait().await;
    }
}

/// A registered worker ready to be scheduled.
pub(crate) struct Station {
    pub(crate) id: Arc<str>,
    pub(crate) worker: WorkerRef,
    pub(crate) config: StationConfig,
    pub(crate) syncs: StationSyncs,
}

impl Station {
    pub(crate) fn new(id: &str, worker: WorkerRef, mut config: StationConfig) -> Self {
        config.id = Some(id.to_string());
        Self {
            id: Arc::from(id),
            worker,
            config,
            syncs: StationSyncs::new(),
        }
    }
}

/// Iteration controller of the loop strand: runs while `count < max`,
/// starting at 0; a negative bound disables the check.
#[derive(Debug)]
pub(crate) struct LoopBound {
    count: u64,
    max: Option<u64>,
}

impl LoopBound {
    pub(crate) fn new(repeat: i64) -> Self {
        Self {
            count: 0,
            max: u64::try_from(repeat).ok(),
        }
    }

    pub(crate) fn check(&self) -> bool {
        match self.max {
            Some(max) => self.count < max,
            None => true,
        }
    }

    pub(crate) fn advance(&mut self) {
        if self.max.is_some() {
            self.count += 1;
        }
    }
}
