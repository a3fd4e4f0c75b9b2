//! Simulation clock.
//!
//! A monotonic accumulator of simulated seconds. Time advances only while
//! the clock is armed; negative frame deltas are clamped to zero rather
//! than rejected.

use serde::{Deserialize, Serialize};

/// Monotonic simulated-time accumulator.
///
/// The engine arms the clock at `start`, stops it at `pause`/`finish`, and
/// feeds it the caller's frame delta on every `advance`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimClock {
    /// Accumulated simulated time in seconds.
    elapsed_secs: f64,
    /// Whether the clock accepts time.
    running: bool,
}

impl SimClock {
    /// Create a stopped clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to time zero, stopped.
    pub fn reset(&mut self) {
        self.elapsed_secs = 0.0;
        self.running = false;
    }

    /// Mark the clock as running.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop accepting time. Elapsed time is preserved.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance by `dt` seconds and return the accumulated time.
    ///
    /// Negative or non-finite deltas are clamped to zero. A stopped clock
    /// returns the unchanged elapsed time.
    pub fn advance(&mut self, dt: f64) -> f64 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if !self.running || dt <= 0.0 {
            return self.elapsed_secs;
        }
        self.elapsed_secs += dt;
        self.elapsed_secs
    }

    /// Accumulated simulated seconds.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed_secs
    }

    /// Whether the clock is currently accepting time.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }
}
