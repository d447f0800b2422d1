//! Physics backend contract
//!
//! [`PhysicsAdapter`] is the seam a real physics engine will plug into.
//! Until then, [`DeterministicCounterAdapter`] advances an integer counter
//! so the environment and its callers can be exercised deterministically.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Stepping and seeding contract for physics backends.
///
/// Implementations must satisfy:
/// - `reset` leaves the adapter idle with a zero step count.
/// - `start` leaves the adapter running with a zero step count.
/// - `stop` leaves the adapter idle and is idempotent.
/// - `step(n)` adds exactly `n` to the step count while running; while idle,
///   or for `n == 0`, it changes nothing.
/// - A seed passed to `reset` or `start` becomes `last_seed`; `None` keeps
///   the previous one.
pub trait PhysicsAdapter: Debug + Send {
    /// Reset internal state and return to idle
    fn reset(&mut self, seed: Option<u64>);

    /// Start a new episode
    fn start(&mut self, seed: Option<u64>);

    /// Stop the current episode if running
    fn stop(&mut self);

    /// Advance the simulation by `num_steps` steps
    fn step(&mut self, num_steps: u64);

    /// Steps advanced in the current episode
    fn step_count(&self) -> u64;

    /// The last seed applied via `reset` or `start`
    fn last_seed(&self) -> Option<u64>;
}

impl<P: PhysicsAdapter + ?Sized> PhysicsAdapter for Box<P> {
    fn reset(&mut self, seed: Option<u64>) {
        (**self).reset(seed);
    }

    fn start(&mut self, seed: Option<u64>) {
        (**self).start(seed);
    }

    fn stop(&mut self) {
        (**self).stop();
    }

    fn step(&mut self, num_steps: u64) {
        (**self).step(num_steps);
    }

    fn step_count(&self) -> u64 {
        (**self).step_count()
    }

    fn last_seed(&self) -> Option<u64> {
        (**self).last_seed()
    }
}

/// Trivial adapter that counts steps instead of simulating anything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicCounterAdapter {
    step_count: u64,
    last_seed: Option<u64>,
    running: bool,
}

impl DeterministicCounterAdapter {
    /// Create an idle adapter with no seed applied
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an episode is currently running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl PhysicsAdapter for DeterministicCounterAdapter {
    fn reset(&mut self, seed: Option<u64>) {
        self.running = false;
        self.step_count = 0;
        if seed.is_some() {
            self.last_seed = seed;
        }
    }

    fn start(&mut self, seed: Option<u64>) {
        self.running = true;
        self.step_count = 0;
        if seed.is_some() {
            self.last_seed = seed;
        }
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn step(&mut self, num_steps: u64) {
        if !self.running || num_steps == 0 {
            return;
        }
        self.step_count += num_steps;
        trace!(num_steps, step_count = self.step_count, "counter advanced");
    }

    fn step_count(&self) -> u64 {
        self.step_count
    }

    fn last_seed(&self) -> Option<u64> {
        self.last_seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_lifecycle() {
        let mut adapter = DeterministicCounterAdapter::new();
        assert_eq!(adapter.step_count(), 0);
        assert_eq!(adapter.last_seed(), None);

        adapter.reset(Some(123));
        assert_eq!(adapter.last_seed(), Some(123));
        assert_eq!(adapter.step_count(), 0);
        assert!(!adapter.is_running());

        // Idle adapters ignore steps
        adapter.step(5);
        assert_eq!(adapter.step_count(), 0);

        adapter.start(None);
        assert!(adapter.is_running());
        assert_eq!(adapter.last_seed(), Some(123));
        adapter.step(2);
        adapter.step(3);
        adapter.step(0);
        assert_eq!(adapter.step_count(), 5);

        adapter.stop();
        adapter.step(10);
        assert_eq!(adapter.step_count(), 5);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut adapter = DeterministicCounterAdapter::new();
        adapter.start(Some(1));
        adapter.step(4);
        adapter.stop();
        adapter.stop();
        assert_eq!(adapter.step_count(), 4);
        assert!(!adapter.is_running());
    }

    #[test]
    fn test_start_zeroes_counter() {
        let mut adapter = DeterministicCounterAdapter::new();
        adapter.start(Some(9));
        adapter.step(7);
        adapter.start(Some(10));
        assert_eq!(adapter.step_count(), 0);
        assert_eq!(adapter.last_seed(), Some(10));
    }

    #[test]
    fn test_boxed_adapter() {
        let mut adapter: Box<dyn PhysicsAdapter> = Box::new(DeterministicCounterAdapter::new());
        adapter.start(Some(3));
        adapter.step(2);
        assert_eq!(adapter.step_count(), 2);
        assert_eq!(adapter.last_seed(), Some(3));
    }
}
