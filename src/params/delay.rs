//! # Delay rules between loop iterations.
//!
//! A [`DelayRule`] computes how long the loop strand waits before its next
//! iteration. It receives an [`Iteration`] describing the invocation that
//! just finished, so rules can be constant, rate-based (`started`), or
//! shaped by a [`BackoffPolicy`].
//!
//! ## Backoff
//! `BackoffPolicy::delay_for(n)` is `first × factor^n`, clamped to `max`,
//! then randomized by [`JitterPolicy`]. The base depends only on `n`, so
//! jitter never feeds back into later delays.
//!
//! ```rust
//! use std::time::Duration;
//! use stationmaster::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(1),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//! assert_eq!(backoff.delay_for(0), Duration::from_millis(100));
//! assert_eq!(backoff.delay_for(3), Duration::from_millis(800));
//! assert_eq!(backoff.delay_for(4), Duration::from_secs(1));
//! ```

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

/// Context handed to a delay rule after each loop iteration.
#[derive(Clone, Copy, Debug)]
pub struct Iteration {
    /// Zero-based index of the iteration that just finished.
    pub index: u64,
    /// When that iteration's invocation started.
    pub started: Instant,
    /// Whether that invocation failed (only observable with `ignore_errors(true)`).
    pub failed: bool,
}

/// Computes the wait before the next loop iteration.
pub type DelayRule = Arc<dyn Fn(&Iteration) -> Duration + Send + Sync>;

/// Randomization applied on top of a backoff delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Exact delay.
    #[default]
    None,
    /// Uniform in `[0, delay]`.
    Full,
    /// `delay/2` plus uniform in `[0, delay/2]`.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to `delay`.
    pub fn apply(&self, delay: Duration) -> Duration {
        let ms = delay.as_millis().min(u128::from(u64::MAX)) as u64;
        if ms == 0 {
            return delay;
        }
        let mut rng = rand::rng();
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => Duration::from_millis(rng.random_range(0..=ms)),
            JitterPolicy::Equal => {
                let half = ms / 2;
                Duration::from_millis(half + rng.random_range(0..=half))
            }
        }
    }
}

/// Exponential delay growth, capped and optionally jittered.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Delay after the first iteration.
    pub first: Duration,
    /// Upper bound for any delay.
    pub max: Duration,
    /// Multiplicative growth factor per iteration.
    pub factor: f64,
    /// Randomization strategy.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// `first = 100ms`, `max = 30s`, `factor = 1.0` (constant), no jitter.
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Delay after iteration `index` (zero-based).
    pub fn delay_for(&self, index: u64) -> Duration {
        let exp = index.min(i32::MAX as u64) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);
        let base = if !secs.is_finite() || secs < 0.0 || secs > self.max.as_secs_f64() {
            self.max
        } else {
            Duration::from_secs_f64(secs)
        };
        self.jitter.apply(base)
    }

    /// Turns the policy into a [`DelayRule`] keyed by the iteration index.
    pub fn into_rule(self) -> DelayRule {
        Arc::new(move |it: &Iteration| self.delay_for(it.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(first_ms: u64, max_ms: u64, factor: f64, jitter: JitterPolicy) -> BackoffPolicy {
        BackoffPolicy {
            first: Duration::from_millis(first_ms),
            max: Duration::from_millis(max_ms),
            factor,
            jitter,
        }
    }

    #[test]
    fn constant_factor_keeps_first() {
        let p = policy(250, 30_000, 1.0, JitterPolicy::None);
        for i in 0..20 {
            assert_eq!(p.delay_for(i), Duration::from_millis(250));
        }
    }

    #[test]
    fn growth_is_capped() {
        let p = policy(100, 5_000, 2.0, JitterPolicy::None);
        assert_eq!(p.delay_for(1), Duration::from_millis(200));
        assert_eq!(p.delay_for(6), Duration::from_millis(5_000));
        assert_eq!(p.delay_for(u64::MAX), Duration::from_millis(5_000));
    }

    #[test]
    fn first_above_max_is_clamped() {
        let p = policy(10_000, 1_000, 2.0, JitterPolicy::None);
        assert_eq!(p.delay_for(0), Duration::from_millis(1_000));
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let full = policy(1_000, 30_000, 1.0, JitterPolicy::Full);
        let equal = policy(1_000, 30_000, 1.0, JitterPolicy::Equal);
        for i in 0..50 {
            assert!(full.delay_for(i) <= Duration::from_millis(1_000));
            let d = equal.delay_for(i);
            assert!(d >= Duration::from_millis(500) && d <= Duration::from_millis(1_000));
        }
    }

    #[test]
    fn rule_reads_iteration_index() {
        let rule = policy(10, 1_000, 2.0, JitterPolicy::None).into_rule();
        let it = Iteration {
            index: 2,
            started: Instant::now(),
            failed: false,
        };
        assert_eq!(rule(&it), Duration::from_millis(40));
    }
}
