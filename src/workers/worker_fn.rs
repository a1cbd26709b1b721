//! # Closure-backed worker (`WorkerFn`)
//!
//! [`WorkerFn`] wraps a closure `F: Fn(CancellationToken, Vec<Value>) -> Fut`,
//! producing a fresh future per invocation. Shared state must be captured
//! explicitly (e.g. an `Arc<AtomicU64>`), since the closure is called
//! concurrently from several strands.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use stationmaster::{args, Value, WorkerError, WorkerFn, WorkerRef};
//!
//! let echo: WorkerRef = WorkerFn::arc(|_ctx: CancellationToken, args: Vec<Value>| async move {
//!     Ok::<_, WorkerError>(args)
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::workers::{Value, Worker};

/// Function-backed worker implementation.
pub struct WorkerFn<F> {
    f: F,
}

impl<F> WorkerFn<F> {
    /// Creates a new function-backed worker.
    ///
    /// Prefer [`WorkerFn::arc`] when you immediately need a [`WorkerRef`](crate::WorkerRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the worker and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Worker for WorkerFn<F>
where
    F: Fn(CancellationToken, Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Value>, WorkerError>> + Send + 'static,
{
    async fn work(
        &self,
        ctx: CancellationToken,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, WorkerError> {
        (self.f)(ctx, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    #[tokio::test]
    async fn closure_receives_arguments() {
        let sum = WorkerFn::new(|_ctx: CancellationToken, args: Vec<Value>| async move {
            let total: u64 = args.iter().filter_map(|v| v.get::<u64>()).sum();
            Ok(args![total])
        });

        let out = sum
            .work(CancellationToken::new(), args![1u64, 2u64, 3u64])
            .await
            .unwrap();
        assert_eq!(out[0].get::<u64>(), Some(6));
    }
}
