//! Fixed-timestep accumulator.

use std::time::Duration;

use crate::constants::{LOOP_TIME, MAX_FRAME_DELTA};

/// Converts wall-clock deltas into a whole number of fixed simulation steps.
///
/// Each delta is clamped to `max_delta` before it is added, so a stalled host never builds up
/// more than one clamp's worth of catch-up ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedStepper {
    step: Duration,
    max_delta: Duration,
    accumulator: Duration,
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(LOOP_TIME, MAX_FRAME_DELTA)
    }
}

impl FixedStepper {
    pub fn new(step: Duration, max_delta: Duration) -> Self {
        Self {
            // A zero step would never drain the accumulator.
            step: step.max(Duration::from_nanos(1)),
            max_delta,
            accumulator: Duration::ZERO,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Adds `delta` to the accumulator and drains it, returning the number of ticks to run.
    pub fn accumulate(&mut self, delta: Duration) -> u32 {
        self.accumulator += delta.min(self.max_delta);

        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
        }
        ticks
    }

    /// Time carried over to the next call.
    pub fn pending(&self) -> Duration {
        self.accumulator
    }

    /// Fraction of a step carried over, useful for render interpolation.
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.step.as_secs_f32()
    }

    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}
