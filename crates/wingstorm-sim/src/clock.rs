//! Fixed-step accumulator: converts real elapsed time into whole simulation
//! ticks, carrying the fractional remainder between calls.

use wingstorm_core::constants::{MAX_CATCH_UP_TICKS, TICK_RATE};

#[derive(Debug, Clone, PartialEq)]
pub struct FixedStep {
    step_secs: f64,
    accumulator: f64,
    max_steps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(TICK_RATE, MAX_CATCH_UP_TICKS)
    }
}

impl FixedStep {
    pub fn new(tick_rate: u32, max_steps: u32) -> Self {
        Self {
            step_secs: 1.0 / tick_rate.max(1) as f64,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Add `elapsed_secs` of real time and return how many ticks to run now.
    ///
    /// At most `max_steps` are returned; whole steps beyond that are dropped
    /// so a stall cannot snowball. Negative input counts as zero.
    pub fn advance(&mut self, elapsed_secs: f64) -> u32 {
        if elapsed_secs.is_finite() {
            self.accumulator += elapsed_secs.max(0.0);
        }
        let due = (self.accumulator / self.step_secs).floor();
        self.accumulator -= due * self.step_secs;
        due.min(self.max_steps as f64) as u32
    }

    /// Time banked toward the next tick.
    pub fn remainder(&self) -> f64 {
        self.accumulator
    }

    pub fn step_secs(&self) -> f64 {
        self.step_secs
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
