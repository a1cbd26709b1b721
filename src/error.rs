//! Error types used by the director runtime and by workers.
//!
//! This module defines two main error enums:
//!
//! - [`DirectorError`] lifecycle misuse and fatal escalation raised by the [`Director`](crate::Director).
//! - [`WorkerError`] failures of individual worker invocations.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::time::Duration;
use thiserror::Error;

use crate::workers::Value;

/// # Errors produced by the director.
///
/// Usage errors (`AlreadyWorks`, `NotWorks`) are returned to the caller of the
/// violating operation and never reach workers or notify channels.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum DirectorError {
    /// Registration or start attempted after the director was started.
    #[error("director is working already")]
    AlreadyWorks,

    /// Waiting attempted before the director was started.
    #[error("director is not working yet")]
    NotWorks,

    /// A station with `fatal_on_error` failed while the director runs
    /// under [`FatalPolicy::Shutdown`](crate::FatalPolicy::Shutdown).
    #[error("fatal failure at station {station}: {error}")]
    Fatal {
        /// Identifier of the failing station.
        station: String,
        /// The failure that was escalated.
        error: WorkerError,
    },
}

impl DirectorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use stationmaster::DirectorError;
    ///
    /// assert_eq!(DirectorError::AlreadyWorks.as_label(), "director_already_works");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DirectorError::AlreadyWorks => "director_already_works",
            DirectorError::NotWorks => "director_not_works",
            DirectorError::Fatal { .. } => "director_fatal",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DirectorError::AlreadyWorks => "already started".to_string(),
            DirectorError::NotWorks => "not started".to_string(),
            DirectorError::Fatal { station, error } => {
                format!("fatal: station={station} {}", error.as_message())
            }
        }
    }
}

/// # Errors produced by worker invocations.
///
/// `Timeout` and `Canceled` are distinct from ordinary failures so that
/// callers (and notify channels) can tell a slow worker from a broken one.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum WorkerError {
    /// The invocation failed.
    ///
    /// `partial` holds whatever results the worker still considers meaningful;
    /// the director forwards them when the station does not halt on errors.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
        /// Partial results of the failed invocation.
        partial: Vec<Value>,
    },

    /// The invocation exceeded its deadline.
    #[error("execution timeout after {timeout:?}")]
    Timeout {
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The invocation scope was cancelled.
    #[error("context cancelled")]
    Canceled,
}

impl WorkerError {
    /// Creates a plain failure without partial results.
    ///
    /// # Example
    /// ```
    /// use stationmaster::WorkerError;
    ///
    /// let err = WorkerError::fail("connection refused");
    /// assert_eq!(err.to_string(), "execution failed: connection refused");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        WorkerError::Fail {
            error: error.into(),
            partial: Vec::new(),
        }
    }

    /// Attaches partial results. Has no effect on `Timeout` and `Canceled`.
    pub fn with_partial(self, values: Vec<Value>) -> Self {
        match self {
            WorkerError::Fail { error, .. } => WorkerError::Fail {
                error,
                partial: values,
            },
            other => other,
        }
    }

    /// Consumes the error and returns its partial results (empty unless `Fail`).
    pub fn into_partial(self) -> Vec<Value> {
        match self {
            WorkerError::Fail { partial, .. } => partial,
            _ => Vec::new(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::Fail { .. } => "worker_failed",
            WorkerError::Timeout { .. } => "worker_timeout",
            WorkerError::Canceled => "worker_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WorkerError::Fail { error, .. } => format!("error: {error}"),
            WorkerError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            WorkerError::Canceled => "context cancelled".to_string(),
        }
    }

    /// True for [`WorkerError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, WorkerError::Timeout { .. })
    }

    /// True for [`WorkerError::Canceled`].
    pub fn is_canceled(&self) -> bool {
        matches!(self, WorkerError::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    #[test]
    fn partial_results_survive_only_on_fail() {
        let err = WorkerError::fail("boom").with_partial(args![1u32, 2u32]);
        assert_eq!(err.as_label(), "worker_failed");
        let partial = err.into_partial();
        assert_eq!(partial.len(), 2);
        assert_eq!(partial[1].downcast_ref::<u32>(), Some(&2));

        let timeout = WorkerError::Timeout {
            timeout: Duration::from_secs(1),
        }
        .with_partial(args![1u32]);
        assert!(timeout.is_timeout());
        assert!(timeout.into_partial().is_empty());
    }

    #[test]
    fn fatal_message_names_station() {
        let err = DirectorError::Fatal {
            station: "ingest".into(),
            error: WorkerError::Canceled,
        };
        assert_eq!(err.as_label(), "director_fatal");
        assert_eq!(err.as_message(), "fatal: station=ingest context cancelled");
        assert!(err.to_string().contains("ingest"));
    }
}
