//! # Worker contract.
//!
//! A [`Worker`] receives a [`CancellationToken`] (the invocation scope) and
//! a list of [`Value`]s, and returns a list of [`Value`]s or a [`WorkerError`].
//! Arguments come from triggers (initial arguments, events) or from the
//! results of the previous worker in a chain.
//!
//! The same worker is shared by every strand of its station (loop, tickers,
//! events) and by cascades, so implementations must tolerate concurrent calls.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::workers::Value;

/// # Asynchronous, cancelable unit of work.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use stationmaster::{Value, Worker, WorkerError};
///
/// struct Double;
///
/// #[async_trait]
/// impl Worker for Double {
///     async fn work(&self, ctx: CancellationToken, args: Vec<Value>) -> Result<Vec<Value>, WorkerError> {
///         if ctx.is_cancelled() {
///             return Err(WorkerError::Canceled);
///         }
///         let n = args.first().and_then(|v| v.get::<u64>()).unwrap_or(0);
///         Ok(vec![Value::new(n * 2)])
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Performs one invocation.
    ///
    /// Implementations should check `ctx` and return [`WorkerError::Canceled`]
    /// promptly once it is cancelled.
    async fn work(
        &self,
        ctx: CancellationToken,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, WorkerError>;
}

/// Shared handle to a worker.
pub type WorkerRef = Arc<dyn Worker>;

#[async_trait]
impl<W: Worker + ?Sized> Worker for Arc<W> {
    async fn work(
        &self,
        ctx: CancellationToken,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, WorkerError> {
        (**self).work(ctx, args).await
    }
}
