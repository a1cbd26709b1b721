//! # Per-invocation deadline.
//!
//! [`Deadline`] wraps a worker and bounds every invocation to a fixed duration.
//!
//! ```text
//! work(ctx, args)
//!   └─► child = ctx.child_token()
//!       select:
//!         inner.work(child, args) ─► its result
//!         sleep(timeout)          ─► child.cancel() ─► Err(Timeout)
//!         ctx.cancelled()         ─► child.cancel() ─► Err(Canceled)
//! ```
//!
//! ## Rules
//! - The inner future is dropped when the deadline or the caller wins; nothing keeps running.
//! - The child token is cancelled first so that spawned helpers observing it can exit too.
//! - Cancelling the child never cancels `ctx`.
//! - A zero timeout expires immediately unless the inner invocation is ready on first poll.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::workers::{Value, Worker};

/// Worker decorator enforcing a maximum duration per invocation.
pub struct Deadline<W> {
    inner: W,
    timeout: Duration,
}

impl<W> Deadline<W> {
    /// Wraps `inner` with the given per-invocation `timeout`.
    pub fn new(inner: W, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The wrapped worker.
    pub fn inner(&self) -> &W {
        &self.inner
    }
}

#[async_trait]
impl<W: Worker> Worker for Deadline<W> {
    async fn work(
        &self,
        ctx: CancellationToken,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, WorkerError> {
        let child = ctx.child_token();

        tokio::select! {
            biased;
            res = self.inner.work(child.clone(), args) => res,
            _ = time::sleep(self.timeout) => {
                child.cancel();
                Err(WorkerError::Timeout { timeout: self.timeout })
            }
            _ = ctx.cancelled() => {
                child.cancel();
                Err(WorkerError::Canceled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::args;
    use crate::workers::WorkerFn;

    fn sleeper(d: Duration) -> impl Worker {
        WorkerFn::new(move |_ctx: CancellationToken, _args: Vec<Value>| async move {
            time::sleep(d).await;
            Ok::<_, WorkerError>(args![7u32])
        })
    }

    #[tokio::test(start_paused = true)]
    async fn inner_result_within_deadline() {
        let worker = Deadline::new(sleeper(Duration::from_millis(10)), Duration::from_secs(1));
        let out = worker.work(CancellationToken::new(), Vec::new()).await.unwrap();
        assert_eq!(out[0].get::<u32>(), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_worker_times_out_and_sees_cancellation() {
        let observed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&observed);
        let slow = WorkerFn::new(move |ctx: CancellationToken, _args: Vec<Value>| {
            let flag = Arc::clone(&flag);
            async move {
                let watcher = ctx.clone();
                tokio::spawn(async move {
                    watcher.cancelled().await;
                    flag.store(true, Ordering::SeqCst);
                });
                time::sleep(Duration::from_secs(60)).await;
                Ok::<_, WorkerError>(Vec::new())
            }
        });

        let worker = Deadline::new(slow, Duration::from_millis(100));
        let err = worker
            .work(CancellationToken::new(), Vec::new())
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.as_message(), "timeout: 100ms");

        time::sleep(Duration::from_millis(1)).await;
        assert!(observed.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn caller_cancellation_wins() {
        let ctx = CancellationToken::new();
        let worker = Deadline::new(sleeper(Duration::from_secs(60)), Duration::from_secs(30));

        let cancel = ctx.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(1)).await;
            cancel.cancel();
        });

        let err = worker.work(ctx.clone(), Vec::new()).await.unwrap_err();
        assert!(err.is_canceled());
        assert!(ctx.is_cancelled());
    }
}
