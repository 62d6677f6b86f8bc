//! Session countdown.
//!
//! The countdown does not read a clock. The host loop feeds it elapsed time
//! through [`Countdown::tick`], so it advances on the same thread, and in
//! the same order, as moves.

use std::time::Duration;

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not started, or already expired.
    Idle,
    /// Still counting; carries the time left.
    Running(Duration),
    /// Reached zero during this tick. Reported once.
    Expired,
}

/// Remaining time for the whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    limit: Duration,
    remaining: Duration,
    running: bool,
    expired: bool,
}

impl Countdown {
    pub fn new(limit: Duration) -> Self {
        Countdown {
            limit,
            remaining: limit,
            running: false,
            expired: false,
        }
    }

    /// Starts counting. Returns true only on the call that started it.
    pub fn start(&mut self) -> bool {
        if self.running || self.expired {
            return false;
        }
        self.running = true;
        true
    }

    /// Stops counting without expiring.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advances the countdown by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.running = false;
            self.expired = true;
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }
}
