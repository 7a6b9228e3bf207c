//! Gravity tick collaborator.
//!
//! Owns the interval between gravity ticks so the core never sees a clock.
//! The interval starts at half a second and shrinks after every tick by
//! `interval / (3000 - 10 * level)`: an exponential decay whose step hits
//! zero once the interval drops below the divisor, which is the natural
//! floor of the progression.

use std::time::Duration;

use crate::types::{BASE_GRAVITY_US, GRAVITY_DECAY_BASE, GRAVITY_DECAY_PER_LEVEL};

#[derive(Debug, Clone)]
pub struct GravityTimer {
    interval_us: u64,
}

impl GravityTimer {
    pub fn new() -> Self {
        Self {
            interval_us: BASE_GRAVITY_US,
        }
    }

    /// Time to wait before the next gravity tick.
    pub fn interval(&self) -> Duration {
        Duration::from_micros(self.interval_us)
    }

    /// Decay the interval after a delivered tick.
    pub fn on_tick(&mut self, level: u32) {
        // Clamped so absurd levels cannot zero the interval in one step.
        let divisor = GRAVITY_DECAY_BASE - GRAVITY_DECAY_PER_LEVEL * i64::from(level);
        let divisor = divisor.max(2) as u64;
        self.interval_us -= self.interval_us / divisor;
    }

    /// Back to the starting interval (game restart).
    pub fn reset(&mut self) {
        self.interval_us = BASE_GRAVITY_US;
    }
}

impl Default for GravityTimer {
    fn default() -> Self {
        Self::new()
    }
}
