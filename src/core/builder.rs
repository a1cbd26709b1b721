use std::sync::Arc;

use crate::{config::DirectorConfig, events::Bus, subscribers::Subscribe};

use super::director::Director;

/// Produces identifiers for stations registered without an explicit `id`.
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Builder for constructing a [`Director`] with optional features.
pub struct DirectorBuilder {
    cfg: DirectorConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    id_generator: Option<IdGenerator>,
}

impl DirectorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: DirectorConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            id_generator: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (registration, strands, failures,
    /// cascades) through dedicated workers with bounded queues. Their workers
    /// are spawned when the director begins.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Replaces the identifier generator used for stations without an explicit `id`.
    ///
    /// The default generator returns a random UUID v4 string.
    pub fn with_id_generator(mut self, generator: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.id_generator = Some(Arc::new(generator));
        self
    }

    /// Builds the director. Does not require a tokio runtime.
    pub fn build(self) -> Director {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let id_generator = self
            .id_generator
            .unwrap_or_else(|| Arc::new(|| uuid::Uuid::new_v4().to_string()));

        Director::new_internal(self.cfg, bus, self.subscribers, id_generator)
    }
}
