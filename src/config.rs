//! # Director configuration.
//!
//! Provides [`DirectorConfig`], the centralized settings of a
//! [`Director`](crate::Director), and [`FatalPolicy`], which decides what a
//! fatal escalation does.
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1

/// How the director reacts when a station with `fatal_on_error` fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FatalPolicy {
    /// Log a diagnostic and abort the process (default).
    #[default]
    Abort,
    /// Record the failure, stop every strand at its next safe point, skip
    /// further cascades, and return the failure from `Director::wait`.
    Shutdown,
}

/// Global configuration for the director runtime.
///
/// All fields are public; prefer the helper accessors over sentinel checks.
#[derive(Clone, Debug)]
pub struct DirectorConfig {
    /// Capacity of the event bus ring buffer.
    ///
    /// Subscribers that lag behind more than `bus_capacity` events skip the
    /// oldest ones. Minimum value is 1.
    pub bus_capacity: usize,

    /// Reaction to fatal escalation.
    pub fatal: FatalPolicy,
}

impl DirectorConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns a copy with a different fatal policy.
    pub fn with_fatal(mut self, fatal: FatalPolicy) -> Self {
        self.fatal = fatal;
        self
    }
}

impl Default for DirectorConfig {
    /// - `bus_capacity = 1024`
    /// - `fatal = FatalPolicy::Abort`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            fatal: FatalPolicy::default(),
        }
    }
}
