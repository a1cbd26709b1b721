//! # Runtime: the started, read-only view of the registry.
//!
//! Once [`Director::begin`](crate::Director::begin) is called, the registry is
//! frozen into a [`Runtime`]. The runtime launches the trigger strands of every
//! station and funnels each invocation through [`Runtime::exec`], the single
//! place where the failure policy is applied and cascades are dispatched.
//!
//! ## Strands per station
//! ```text
//! Station
//!   ├─► loop strand (1)         args ─► exec ─► results ─► [delay] ─► exec ─► ...
//!   ├─► ticker strands (1/period) tick ─► exec(args) ─► tick ─► exec(args) ─► ...
//!   └─► event strands (1/source)  recv ─► exec([value]) ─► recv ─► ...
//!
//! exec(station, args)
//!   ├─► worker.work(scope.child_token(), args)
//!   ├─ Err ─► notify? ─► fatal? ─► halt? ─► Outcome { proceed: false }
//!   └─► for id in next: cascades.spawn(exec(stations[id], results))   (detached)
//! ```
//!
//! ## Rules
//! - No lock is held while a worker runs; the registry is an immutable map.
//! - Only the strand that observed a halting failure stops; siblings keep going.
//! - Cascades are tracked by a runtime-wide tracker, never by station counters.
//! - Safe points (before an invocation, during a delay, while waiting for a
//!   tick or an event) observe shutdown, and the station scope when
//!   `stop_on_cancel` is set.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::FatalPolicy;
use crate::core::station::{LoopBound, Station, Trigger};
use crate::error::{DirectorError, WorkerError};
use crate::events::{Bus, Event, EventKind};
use crate::params::{EventSource, Iteration};
use crate::workers::Value;

/// Result of one invocation as seen by the triggering strand.
pub(crate) struct Outcome {
    /// Results, or partial results of a failure.
    pub(crate) results: Vec<Value>,
    /// False when the strand must stop.
    pub(crate) proceed: bool,
    /// Whether the worker failed.
    pub(crate) failed: bool,
}

impl Outcome {
    fn halt(results: Vec<Value>) -> Self {
        Self {
            results,
            proceed: false,
            failed: true,
        }
    }
}

pub(crate) struct Runtime {
    stations: HashMap<String, Arc<Station>>,
    bus: Bus,
    cascades: TaskTracker,
    shutdown: CancellationToken,
    fatal_policy: FatalPolicy,
    fatal: OnceLock<DirectorError>,
}

impl Runtime {
    pub(crate) fn new(
        stations: HashMap<String, Arc<Station>>,
        bus: Bus,
        fatal_policy: FatalPolicy,
    ) -> Self {
        Self {
            stations,
            bus,
            cascades: TaskTracker::new(),
            shutdown: CancellationToken::new(),
            fatal_policy,
            fatal: OnceLock::new(),
        }
    }

    pub(crate) fn stations(&self) -> impl Iterator<Item = &Arc<Station>> {
        self.stations.values()
    }

    /// Spawns every strand of `station`, then closes its counters.
    pub(crate) fn launch(self: &Arc<Self>, station: &Arc<Station>) {
        let syncs = &station.syncs;

        if let Some(loops) = syncs.tracker(Trigger::Loop) {
            loops.spawn(Arc::clone(self).run_loop(Arc::clone(station)));
        }

        if let Some(tickers) = syncs.tracker(Trigger::Ticker) {
            for &period in &station.config.tickers {
                if period.is_zero() {
                    self.bus.publish(
                        Event::new(EventKind::TickerRejected).with_station(station.id.clone()),
                    );
                    continue;
                }
                tickers.spawn(Arc::clone(self).run_ticker(Arc::clone(station), period));
            }
        }

        if let Some(events) = syncs.tracker(Trigger::Event) {
            for source in &station.config.sources {
                events.spawn(Arc::clone(self).run_events(Arc::clone(station), source.clone()));
            }
        }

        syncs.close();
    }

    async fn run_loop(self: Arc<Self>, st: Arc<Station>) {
        self.strand_started(&st, Trigger::Loop, None);

        let mut bound = LoopBound::new(st.config.repeat);
        let mut args = st.config.args.clone();
        let mut index = 0u64;

        let reason = loop {
            if !bound.check() {
                break "completed";
            }
            if self.is_halted(&st) {
                break "stopped";
            }

            let started = Instant::now();
            let outcome = self.exec(&st, Trigger::Loop, args).await;
            if !outcome.proceed {
                break "halted";
            }
            bound.advance();

            if let Some(rule) = &st.config.delay {
                if bound.check() {
                    let wait = rule(&Iteration {
                        index,
                        started,
                        failed: outcome.failed,
                    });
                    tokio::select! {
                        _ = time::sleep(wait) => {}
                        _ = self.halted(&st) => break "stopped",
                    }
                }
            }

            args = outcome.results;
            index += 1;
        };

        self.strand_stopped(&st, Trigger::Loop, reason);
    }

    async fn run_ticker(self: Arc<Self>, st: Arc<Station>, period: Duration) {
        self.strand_started(&st, Trigger::Ticker, Some(period));

        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let reason = loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.halted(&st) => break "stopped",
            }
            if self.is_halted(&st) {
                break "stopped";
            }

            let outcome = self.exec(&st, Trigger::Ticker, st.config.args.clone()).await;
            if !outcome.proceed {
                break "halted";
            }
        };

        self.strand_stopped(&st, Trigger::Ticker, reason);
    }

    async fn run_events(self: Arc<Self>, st: Arc<Station>, source: EventSource) {
        self.strand_started(&st, Trigger::Event, None);

        let reason = loop {
            // A value taken off the source is always processed.
            let received = tokio::select! {
                biased;
                _ = self.halted(&st) => break "stopped",
                v = source.recv() => v,
            };
            let Some(value) = received else {
                break "closed";
            };

            let outcome = self.exec(&st, Trigger::Event, vec![value]).await;
            if !outcome.proceed {
                break "halted";
            }
        };

        self.strand_stopped(&st, Trigger::Event, reason);
    }

    /// Invokes the worker of `st` and applies its failure policy.
    ///
    /// Boxed because cascades re-enter it from spawned tasks.
    pub(crate) fn exec(
        self: &Arc<Self>,
        st: &Arc<Station>,
        trigger: Trigger,
        args: Vec<Value>,
    ) -> BoxFuture<'static, Outcome> {
        let rt = Arc::clone(self);
        let st = Arc::clone(st);

        async move {
            let ctx = st.config.scope.child_token();
            let (results, failed) = match st.worker.work(ctx, args).await {
                Ok(results) => (results, false),
                Err(err) => {
                    rt.bus.publish(
                        Event::new(EventKind::InvocationFailed)
                            .with_station(st.id.clone())
                            .with_trigger(trigger)
                            .with_reason(err.to_string()),
                    );

                    let policy = &st.config.policy;
                    if let Some(sink) = &policy.notify {
                        // A dropped receiver only means nobody listens anymore.
                        if sink.send(err.clone()).await.is_ok() {
                            rt.bus.publish(
                                Event::new(EventKind::ErrorNotified)
                                    .with_station(st.id.clone())
                                    .with_trigger(trigger),
                            );
                        }
                    }
                    if policy.fatal_on_error {
                        rt.escalate(&st, trigger, err);
                        return Outcome::halt(Vec::new());
                    }
                    if policy.halt_on_error {
                        return Outcome::halt(err.into_partial());
                    }
                    (err.into_partial(), true)
                }
            };

            rt.cascade(&st, &results);
            Outcome {
                results,
                proceed: true,
                failed,
            }
        }
        .boxed()
    }

    /// Dispatches `results` to every downstream station of `from`.
    fn cascade(self: &Arc<Self>, from: &Station, results: &[Value]) {
        if self.shutdown.is_cancelled() {
            return;
        }
        for id in &from.config.next {
            let Some(target) = self.stations.get(id) else {
                self.bus.publish(
                    Event::new(EventKind::CascadeMissing)
                        .with_station(from.id.clone())
                        .with_target(id.as_str()),
                );
                continue;
            };
            if self.is_halted(target) {
                continue;
            }

            self.bus.publish(
                Event::new(EventKind::CascadeDispatched)
                    .with_station(from.id.clone())
                    .with_target(target.id.clone()),
            );
            self.cascades
                .spawn(self.exec(target, Trigger::Cascade, results.to_vec()));
        }
    }

    /// Handles a failure of a station with `fatal_on_error`.
    fn escalate(&self, st: &Station, trigger: Trigger, err: WorkerError) {
        self.bus.publish(
            Event::new(EventKind::FatalEscalated)
                .with_station(st.id.clone())
                .with_trigger(trigger)
                .with_reason(err.to_string()),
        );

        match self.fatal_policy {
            FatalPolicy::Abort => {
                tracing::error!(
                    station = %st.id,
                    trigger = trigger.as_str(),
                    error = %err,
                    "fatal worker failure, aborting"
                );
                std::process::abort();
            }
            FatalPolicy::Shutdown => {
                let _ = self.fatal.set(DirectorError::Fatal {
                    station: st.id.to_string(),
                    error: err,
                });
                self.stop("fatal");
            }
        }
    }

    /// Cancels every strand at its next safe point. Idempotent.
    pub(crate) fn stop(&self, reason: &'static str) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.bus
            .publish(Event::new(EventKind::ShutdownRequested).with_reason(reason));
        self.shutdown.cancel();
    }

    /// Resolves when `st` must stop starting new invocations.
    async fn halted(&self, st: &Station) {
        if st.config.stop_on_cancel {
            tokio::select! {
                _ = self.shutdown.cancelled() => {}
                _ = st.config.scope.cancelled() => {}
            }
        } else {
            self.shutdown.cancelled().await
        }
    }

    fn is_halted(&self, st: &Station) -> bool {
        self.shutdown.is_cancelled() || (st.config.stop_on_cancel && st.config.scope.is_cancelled())
    }

    /// Waits for every loop/ticker/event strand of every station.
    pub(crate) async fn wait_strands(&self) {
        for st in self.stations.values() {
            st.syncs.wait().await;
        }
    }

    /// Waits for detached cascades, including the ones they spawn.
    pub(crate) async fn wait_cascades(&self) {
        self.cascades.close();
        self.cascades.wait().await;
    }

    /// Number of cascade invocations still running.
    pub(crate) fn cascades_running(&self) -> usize {
        self.cascades.len()
    }

    /// Number of strands still running across all stations.
    pub(crate) fn strands_running(&self) -> usize {
        self.stations.values().map(|st| st.syncs.running()).sum()
    }

    pub(crate) fn fatal_error(&self) -> Option<DirectorError> {
        self.fatal.get().cloned()
    }

    fn strand_started(&self, st: &Station, trigger: Trigger, period: Option<Duration>) {
        let mut ev = Event::new(EventKind::StrandStarted)
            .with_station(st.id.clone())
            .with_trigger(trigger);
        if let Some(period) = period {
            ev = ev.with_period(period);
        }
        self.bus.publish(ev);
    }

    fn strand_stopped(&self, st: &Station, trigger: Trigger, reason: &'static str) {
        self.bus.publish(
            Event::new(EventKind::StrandStopped)
                .with_station(st.id.clone())
                .with_trigger(trigger)
                .with_reason(reason),
        );
    }
}
