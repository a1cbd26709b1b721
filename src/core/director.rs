//! # Director: registry of stations and lifecycle of their strands.
//!
//! The [`Director`] collects workers with their parameters while it is
//! *building*, then freezes them into a read-only runtime on
//! [`Director::begin`]. From that point on registration is rejected and the
//! caller can [`wait`](Director::wait) for the strands to finish.
//!
//! ## Lifecycle
//! ```text
//! Director::new() / Director::builder(cfg).build()
//!     │
//!     ├─► with(worker, [params])   ─► Building { stations, subscribers }   (repeatable)
//!     │
//!     ├─► begin([overrides])       ─► Started(Arc<Runtime>)
//!     │        ├─ overrides applied to every station
//!     │        ├─ subscriber listener: Bus ─► SubscriberSet::emit
//!     │        └─ Runtime::launch per station (concurrently)
//!     │
//!     ├─► wait()                   ─► loop/ticker/event strands of every station exited
//!     ├─► wait_all()               ─► ... and every detached cascade finished
//!     ├─► shutdown()               ─► strands exit at their next safe point
//!     └─► drop                     ─► subscriber listener forwards buffered events and stops
//! ```
//!
//! ## Rules
//! - `with` and `begin` after start return [`DirectorError::AlreadyWorks`]; the registry is unchanged.
//! - `wait`, `wait_all` and `shutdown` before start return [`DirectorError::NotWorks`].
//! - The phase lock is never held across an `.await`, a worker call or the identifier generator.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use stationmaster::{args, params, Director, Value, WorkerError, WorkerFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let director = Director::new();
//!
//!     let double = WorkerFn::arc(|_ctx: CancellationToken, args: Vec<Value>| async move {
//!         let n = args.first().and_then(|v| v.get::<u64>()).unwrap_or(0);
//!         Ok::<_, WorkerError>(args![n * 2])
//!     });
//!     let print = WorkerFn::arc(|_ctx: CancellationToken, args: Vec<Value>| async move {
//!         println!("{:?}", args.first().and_then(|v| v.get::<u64>()));
//!         Ok::<_, WorkerError>(Vec::new())
//!     });
//!
//!     director
//!         .with(double, [
//!             params::id("double"),
//!             params::args(args![1u64]),
//!             params::repeat(3),
//!             params::delay(Duration::from_millis(10)),
//!             params::next(["print"]),
//!         ])?
//!         .with(print, [params::id("print")])?;
//!
//!     director.begin([]).await?;
//!     director.wait_all().await?;
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    config::DirectorConfig,
    error::DirectorError,
    events::{Bus, Event, EventKind},
    params::{Param, StationConfig},
    subscribers::{Subscribe, SubscriberSet},
    workers::{Worker, WorkerRef},
};

use super::builder::{DirectorBuilder, IdGenerator};
use super::runtime::Runtime;
use super::station::Station;

/// A registered worker waiting for `begin`.
struct Draft {
    worker: WorkerRef,
    config: StationConfig,
}

#[derive(Default)]
struct Building {
    stations: HashMap<String, Draft>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    events: Option<broadcast::Receiver<Event>>,
}

enum Phase {
    Building(Building),
    Started(Arc<Runtime>),
}

/// Registers workers as stations and drives them once started.
pub struct Director {
    cfg: DirectorConfig,
    bus: Bus,
    id_generator: IdGenerator,
    phase: Mutex<Phase>,
    /// Stops the subscriber listener when the director is dropped.
    listener: CancellationToken,
}

impl Director {
    /// Creates a director with [`DirectorConfig::default`] and no subscribers.
    pub fn new() -> Self {
        DirectorBuilder::new(DirectorConfig::default()).build()
    }

    /// Returns a builder for a director with custom configuration.
    pub fn builder(cfg: DirectorConfig) -> DirectorBuilder {
        DirectorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: DirectorConfig,
        bus: Bus,
        subscribers: Vec<Arc<dyn Subscribe>>,
        id_generator: IdGenerator,
    ) -> Self {
        // Subscribe before registration so that `StationRegistered` events are buffered.
        let events = (!subscribers.is_empty()).then(|| bus.subscribe());

        Self {
            cfg,
            bus,
            id_generator,
            phase: Mutex::new(Phase::Building(Building {
                stations: HashMap::new(),
                subscribers,
                events,
            })),
            listener: CancellationToken::new(),
        }
    }

    /// Returns the global configuration.
    pub fn config(&self) -> &DirectorConfig {
        &self.cfg
    }

    /// Returns the event bus; receivers see events published after subscribing.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Registers `worker` as a station configured by `params`, applied in order.
    ///
    /// The station takes the identifier set by [`params::id`](crate::params::id)
    /// or, if none, one from the identifier generator. A station already
    /// registered under the same identifier is replaced.
    ///
    /// Returns [`DirectorError::AlreadyWorks`] after [`begin`](Self::begin).
    pub fn with<W: Worker>(
        &self,
        worker: W,
        params: impl IntoIterator<Item = Param>,
    ) -> Result<&Self, DirectorError> {
        let mut config = StationConfig::default();
        for param in params {
            param.apply(&mut config);
        }

        // The generator is user code; never call it under the phase lock.
        let id = match config.explicit_id() {
            Some(id) => id.to_string(),
            None => (self.id_generator)(),
        };
        config.id = Some(id.clone());

        {
            let mut phase = self.phase.lock();
            let Phase::Building(building) = &mut *phase else {
                return Err(DirectorError::AlreadyWorks);
            };
            building.stations.insert(
                id.clone(),
                Draft {
                    worker: Arc::new(worker),
                    config,
                },
            );
        }

        self.bus
            .publish(Event::new(EventKind::StationRegistered).with_station(id));
        Ok(self)
    }

    /// Starts every registered station.
    ///
    /// `params` are applied to each station's configuration after its own
    /// parameters. They cannot move a station to another identifier.
    /// Returns once every station has spawned its strands, not once they finish.
    ///
    /// Returns [`DirectorError::AlreadyWorks`] if called twice.
    pub async fn begin(&self, params: impl IntoIterator<Item = Param>) -> Result<(), DirectorError> {
        let overrides: Vec<Param> = params.into_iter().collect();

        let (runtime, subscribers, events) = {
            let mut phase = self.phase.lock();
            let building = match &mut *phase {
                Phase::Building(building) => std::mem::take(building),
                Phase::Started(_) => return Err(DirectorError::AlreadyWorks),
            };

            let mut stations = HashMap::with_capacity(building.stations.len());
            for (id, draft) in building.stations {
                let mut config = draft.config;
                for param in &overrides {
                    param.apply(&mut config);
                }
                let station = Station::new(&id, draft.worker, config);
                stations.insert(id, Arc::new(station));
            }

            let runtime = Arc::new(Runtime::new(stations, self.bus.clone(), self.cfg.fatal));
            *phase = Phase::Started(Arc::clone(&runtime));
            (runtime, building.subscribers, building.events)
        };

        if let Some(events) = events {
            self.subscriber_listener(events, subscribers);
        }

        let mut set = JoinSet::new();
        for station in runtime.stations() {
            let runtime = Arc::clone(&runtime);
            let station = Arc::clone(station);
            set.spawn(async move { runtime.launch(&station) });
        }
        let mut launched = 0usize;
        while set.join_next().await.is_some() {
            launched += 1;
        }

        self.bus
            .publish(Event::new(EventKind::DirectorStarted).with_reason(launched.to_string()));
        Ok(())
    }

    /// Waits until the loop, ticker and event strands of every station exit.
    ///
    /// Detached cascades are not waited for; see [`wait_all`](Self::wait_all).
    /// Returns [`DirectorError::Fatal`] if a fatal failure stopped the director
    /// under [`FatalPolicy::Shutdown`](crate::FatalPolicy::Shutdown).
    pub async fn wait(&self) -> Result<(), DirectorError> {
        let runtime = self.runtime()?;
        runtime.wait_strands().await;
        Self::verdict(&runtime)
    }

    /// Like [`wait`](Self::wait), then also waits for every detached cascade,
    /// including cascades spawned by cascades.
    pub async fn wait_all(&self) -> Result<(), DirectorError> {
        let runtime = self.runtime()?;
        runtime.wait_strands().await;
        runtime.wait_cascades().await;
        Self::verdict(&runtime)
    }

    /// Asks every strand to exit at its next safe point and skips further cascades.
    ///
    /// Running invocations are not interrupted. Idempotent.
    pub fn shutdown(&self) -> Result<(), DirectorError> {
        self.runtime()?.stop("requested");
        Ok(())
    }

    /// Returns the registered identifiers, sorted.
    pub fn stations(&self) -> Vec<String> {
        let mut ids: Vec<String> = match &*self.phase.lock() {
            Phase::Building(building) => building.stations.keys().cloned().collect(),
            Phase::Started(runtime) => runtime.stations().map(|st| st.id.to_string()).collect(),
        };
        ids.sort_unstable();
        ids
    }

    /// True once [`begin`](Self::begin) has been called.
    pub fn is_started(&self) -> bool {
        matches!(&*self.phase.lock(), Phase::Started(_))
    }

    /// Number of loop, ticker and event strands still running (0 before start).
    pub fn running_strands(&self) -> usize {
        self.runtime().map_or(0, |rt| rt.strands_running())
    }

    /// Number of detached cascade invocations still running (0 before start).
    pub fn running_cascades(&self) -> usize {
        self.runtime().map_or(0, |rt| rt.cascades_running())
    }

    fn runtime(&self) -> Result<Arc<Runtime>, DirectorError> {
        match &*self.phase.lock() {
            Phase::Started(runtime) => Ok(Arc::clone(runtime)),
            Phase::Building(_) => Err(DirectorError::NotWorks),
        }
    }

    fn verdict(runtime: &Runtime) -> Result<(), DirectorError> {
        match runtime.fatal_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Subscribes to the bus and forwards events to the subscriber set.
    ///
    /// The set publishes overflow/panic events on the same bus, so the channel
    /// never closes while it lives; the listener stops on `self.listener`
    /// instead, forwards what is already buffered, then drains the set.
    fn subscriber_listener(
        &self,
        mut rx: broadcast::Receiver<Event>,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) {
        let set = SubscriberSet::new(subscribers, self.bus.clone());
        let stop = self.listener.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => break,
                    res = rx.recv() => match res {
                        Ok(ev) => set.emit(ev),
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            // Bounded: emitting may publish overflow events onto the same bus.
            for _ in 0..rx.len() {
                match rx.try_recv() {
                    Ok(ev) => set.emit(ev),
                    Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                    Err(_) => break,
                }
            }
            drop(rx);
            set.shutdown().await;
        });
    }
}

impl Default for Director {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Director {
    fn drop(&mut self) {
        self.listener.cancel();
    }
}
