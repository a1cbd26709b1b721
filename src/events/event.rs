//! # Runtime events emitted by the director and its strands.
//!
//! The [`EventKind`] enum classifies events across four categories:
//! - **Lifecycle**: registration, start, shutdown
//! - **Strands**: a trigger strand started or exited
//! - **Invocations**: failures, notifications, cascades, fatal escalation
//! - **Subscribers**: overflow and panics inside subscriber workers
//!
//! The [`Event`] struct carries metadata such as the station, the trigger
//! that produced the event, and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use stationmaster::{Event, EventKind, Trigger};
//!
//! let ev = Event::new(EventKind::InvocationFailed)
//!     .with_station("ingest")
//!     .with_trigger(Trigger::Loop)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.station.as_deref(), Some("ingest"));
//! assert_eq!(ev.trigger, Some(Trigger::Loop));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::core::Trigger;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle ===
    /// A station was added to the registry.
    ///
    /// Sets: `station`
    StationRegistered,

    /// `Director::begin` launched every station.
    ///
    /// Sets: `reason` (number of stations)
    DirectorStarted,

    /// `Director::shutdown` was called or a fatal escalation stopped the runtime.
    ///
    /// Sets: `reason` (optional)
    ShutdownRequested,

    // === Strands ===
    /// A trigger strand started.
    ///
    /// Sets: `station`, `trigger`, `period` (tickers only)
    StrandStarted,

    /// A trigger strand exited.
    ///
    /// Sets: `station`, `trigger`, `reason` (`completed`, `halted`, `closed`, `stopped`)
    StrandStopped,

    /// A ticker with a zero period was skipped.
    ///
    /// Sets: `station`
    TickerRejected,

    // === Invocations ===
    /// A worker invocation failed.
    ///
    /// Sets: `station`, `trigger`, `reason`
    InvocationFailed,

    /// A failure was handed to the station's notify channel.
    ///
    /// Sets: `station`, `trigger`
    ErrorNotified,

    /// Results were dispatched to a downstream station.
    ///
    /// Sets: `station` (source), `target`
    CascadeDispatched,

    /// A downstream identifier was not found in the registry.
    ///
    /// Sets: `station` (source), `target`
    CascadeMissing,

    /// A failure was escalated to a fatal condition.
    ///
    /// Sets: `station`, `trigger`, `reason`
    FatalEscalated,

    // === Subscribers ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `station` (subscriber name), `reason`
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `station` (subscriber name), `reason`
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Station the event is about.
    pub station: Option<Arc<str>>,
    /// Trigger strand that produced the event.
    pub trigger: Option<Trigger>,
    /// Downstream station for cascade events.
    pub target: Option<Arc<str>>,
    /// Ticker period.
    pub period: Option<Duration>,
    /// Human-readable reason (errors, exit causes, overflow details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            station: None,
            trigger: None,
            target: None,
            period: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_station(mut self, station: impl Into<Arc<str>>) -> Self {
        self.station = Some(station.into());
        self
    }

    #[inline]
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[inline]
    pub fn with_target(mut self, target: impl Into<Arc<str>>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[inline]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_station(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_station(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::StrandStarted);
        let b = Event::new(EventKind::StrandStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn overflow_event_names_subscriber() {
        let ev = Event::subscriber_overflow("log", "full");
        assert_eq!(ev.kind, EventKind::SubscriberOverflow);
        assert_eq!(ev.station.as_deref(), Some("log"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=log reason=full"));
    }
}
