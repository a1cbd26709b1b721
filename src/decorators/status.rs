//! # In-flight and completion counters for a worker.
//!
//! [`Status`] wraps a worker and counts invocations with atomics, so the same
//! instance can be shared by every strand of a station (and by several
//! stations) and inspected from outside while the director runs.
//!
//! - `working()` invocations currently running (gauge)
//! - `executed()` invocations that returned, successfully or not (monotonic)

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::workers::{Value, Worker};

/// Worker decorator exposing live invocation counters.
pub struct Status<W> {
    inner: W,
    working: AtomicU64,
    executed: AtomicU64,
}

impl<W> Status<W> {
    /// Wraps `inner` with zeroed counters.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            working: AtomicU64::new(0),
            executed: AtomicU64::new(0),
        }
    }

    /// Number of invocations currently in flight.
    pub fn working(&self) -> u64 {
        self.working.load(Ordering::Acquire)
    }

    /// Number of invocations that have returned.
    pub fn executed(&self) -> u64 {
        self.executed.load(Ordering::Acquire)
    }

    /// True while at least one invocation is in flight.
    pub fn is_busy(&self) -> bool {
        self.working() > 0
    }

    /// The wrapped worker.
    pub fn inner(&self) -> &W {
        &self.inner
    }
}

/// Decrements the gauge when the invocation ends, including when its future is dropped.
struct InFlight<'a> {
    working: &'a AtomicU64,
    executed: &'a AtomicU64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.working.fetch_sub(1, Ordering::AcqRel);
        self.executed.fetch_add(1, Ordering::AcqRel);
    }
}

#[async_trait]
impl<W: Worker> Worker for Status<W> {
    async fn work(
        &self,
        ctx: CancellationToken,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, WorkerError> {
        self.working.fetch_add(1, Ordering::AcqRel);
        let _guard = InFlight {
            working: &self.working,
            executed: &self.executed,
        };
        self.inner.work(ctx, args).await
    }
}
