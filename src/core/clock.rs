//! Wall-Clock Abstraction
//!
//! The round machine derives the multiplier from elapsed wall time,
//! never from tick count. Injecting the clock lets tests drive the
//! machine deterministically with no real time passing.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Local, Timelike, Utc};

/// Time source for the engine.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Hour of day on the player's local clock (0-23).
    ///
    /// Drives the daily-bonus lucky hour.
    fn local_hour(&self) -> u32;
}

/// System clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// Manually advanced clock for tests and headless demos.
///
/// Clones share the same underlying instant, so a handle kept by the
/// driver advances the clock a session owns.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
    hour: Rc<Cell<u32>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`, local hour 0.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
            hour: Rc::new(Cell::new(0)),
        }
    }

    /// Advance by `ms` milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.now.set(self.now.get() + Duration::milliseconds(ms as i64));
    }

    /// Advance by whole hours.
    pub fn advance_hours(&self, hours: u64) {
        self.now.set(self.now.get() + Duration::hours(hours as i64));
    }

    /// Override the reported local hour.
    pub fn set_local_hour(&self, hour: u32) {
        self.hour.set(hour % 24);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn local_hour(&self) -> u32 {
        self.hour.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(DateTime::UNIX_EPOCH);
        let start = clock.now();
        clock.advance_ms(1500);
        assert_eq!((clock.now() - start).num_milliseconds(), 1500);
    }

    #[test]
    fn clones_share_the_same_instant() {
        let clock = ManualClock::new(DateTime::UNIX_EPOCH);
        let handle = clock.clone();
        handle.advance_ms(42);
        assert_eq!(clock.now(), handle.now());
    }

    #[test]
    fn local_hour_wraps_at_24() {
        let clock = ManualClock::new(DateTime::UNIX_EPOCH);
        clock.set_local_hour(25);
        assert_eq!(clock.local_hour(), 1);
    }
}
