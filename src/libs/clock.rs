//! Time sources consumed by the tracker.
//!
//! Every timestamp the engine stores comes from a [`Clock`]. The production
//! clock is monotonic: it reads the local time once and advances it with
//! [`std::time::Instant`], so daylight saving changes and wall-clock
//! adjustments never move it. [`ManualClock`] is moved by hand and is what
//! simulations and tests drive the engine with.

use chrono::{Duration, Local, NaiveDateTime};
use parking_lot::Mutex;
use std::time::Instant;

/// Supplies the current instant. Successive readings must never decrease.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Monotonic clock labelled with the local time it was created at.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    base: NaiveDateTime,
    anchor: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            base: Local::now().naive_local(),
            anchor: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let elapsed = Duration::from_std(self.anchor.elapsed()).unwrap_or(Duration::MAX);
        self.base.checked_add_signed(elapsed).unwrap_or(NaiveDateTime::MAX)
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self { current: Mutex::new(start) }
    }

    /// Moves the clock forward by `delta` and returns the new instant.
    pub fn advance(&self, delta: Duration) -> NaiveDateTime {
        let mut current = self.current.lock();
        *current += delta;
        *current
    }

    pub fn set(&self, instant: NaiveDateTime) {
        *self.current.lock() = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.current.lock()
    }
}
