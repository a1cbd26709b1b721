//! # LogWriter: events rendered through `tracing`
//!
//! A subscriber that turns every [`Event`] into a `tracing` record. Install
//! any `tracing` subscriber (e.g. `tracing_subscriber::fmt`) to see them.
//!
//! ## Levels
//! - `error`: fatal escalation, subscriber panics
//! - `warn`: invocation failures, missing cascade targets, rejected tickers, overflow
//! - `info`: registration, start, shutdown
//! - `debug`: strands, notifications, cascades

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let station = e.station.as_deref().unwrap_or("-");
        let trigger = e.trigger.map(|t| t.as_str()).unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::StationRegistered => {
                tracing::info!(station, "station registered");
            }
            EventKind::DirectorStarted => {
                tracing::info!(stations = reason, "director started");
            }
            EventKind::ShutdownRequested => {
                tracing::info!(reason, "shutdown requested");
            }
            EventKind::StrandStarted => {
                tracing::debug!(station, trigger, period = ?e.period, "strand started");
            }
            EventKind::StrandStopped => {
                tracing::debug!(station, trigger, reason, "strand stopped");
            }
            EventKind::TickerRejected => {
                tracing::warn!(station, "ticker with zero period skipped");
            }
            EventKind::InvocationFailed => {
                tracing::warn!(station, trigger, error = reason, "invocation failed");
            }
            EventKind::ErrorNotified => {
                tracing::debug!(station, trigger, "error notified");
            }
            EventKind::CascadeDispatched => {
                tracing::debug!(station, target = ?e.target, "cascade dispatched");
            }
            EventKind::CascadeMissing => {
                tracing::warn!(station, target = ?e.target, "cascade target not registered");
            }
            EventKind::FatalEscalated => {
                tracing::error!(station, trigger, error = reason, "fatal failure");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(subscriber = station, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(subscriber = station, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
