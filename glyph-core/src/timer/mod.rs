//! Round countdown.
//!
//! The countdown never reads a clock. A scheduler outside the core feeds it
//! fixed slices through [`Countdown::advance`]; re-arming it for a new round
//! is what cancels the previous one.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// What a single advance did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownStatus {
    /// Not armed; the slice was ignored
    Idle,
    Running,
    /// Reached zero on this slice; the countdown is now idle
    Expired,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    limit: f64,
    remaining: f64,
    running: bool,
}

/// Time limit for a round: `max(8, base_time - 1.5 * level - round_count)`
pub fn round_time_limit(base_time: f64, level: f64, round_count: u32) -> f64 {
    (base_time - TIME_PER_LEVEL * level - round_count as f64).max(MIN_ROUND_TIME_SECS)
}

impl Countdown {
    /// Arms the countdown with a fresh limit, discarding any previous round.
    pub fn arm(&mut self, limit: f64) {
        self.limit = limit;
        self.remaining = limit;
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Sets the remaining time, clamped to [0, limit].
    pub fn set_remaining(&mut self, remaining: f64) {
        self.remaining = remaining.clamp(0.0, self.limit.max(0.0));
    }

    /// Whole seconds shown to the player (rounded up)
    pub fn display_seconds(&self) -> u32 {
        self.remaining.max(0.0).ceil() as u32
    }

    /// Fraction of the limit left, for the time meter
    pub fn ratio(&self) -> f64 {
        if self.limit <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.limit).max(0.0)
    }

    /// Subtracts one slice. Expires (and stops) once remaining reaches zero.
    pub fn advance(&mut self, dt: f64) -> CountdownStatus {
        if !self.running {
            return CountdownStatus::Idle;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.running = false;
            CountdownStatus::Expired
        } else {
            CountdownStatus::Running
        }
    }
}
