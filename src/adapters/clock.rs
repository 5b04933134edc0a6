//! Clock adapters.
//!
//! - [`SystemClock`] reads local wall-clock time via `chrono::Local`.
//! - [`SimulatedClock`] is advanced by hand; the simulator and tests use it
//!   to step through days without waiting.

use std::cell::Cell;

use chrono::{Duration, Local, NaiveDateTime};

use crate::app::ports::ClockPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually stepped clock.  Never moves on its own.
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    now: Cell<NaiveDateTime>,
}

impl SimulatedClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_hours(&self, hours: i64) {
        self.advance(Duration::hours(hours));
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(Duration::days(days));
    }
}

impl ClockPort for SimulatedClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}
