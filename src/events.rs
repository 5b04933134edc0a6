//! Calorie reading channel.
//!
//! The activity provider (a HealthKit-style poller, a replay file, the
//! simulator) pushes readings in; the [`AppService`](crate::app::service::AppService)
//! drains them on its own schedule.  Neither side knows about the other.
//!
//! ```text
//! ┌──────────────┐  CalorieReading  ┌──────────────┐
//! │  Provider    │─────────────────▶│  AppService  │
//! │  (any task)  │   bounded, FIFO  │  (owner)     │
//! └──────────────┘                  └──────────────┘
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::warn;

/// Channel depth.  Readings beyond this are dropped until the next drain.
pub const CALORIE_QUEUE_CAP: usize = 16;

/// One sample from the activity provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalorieReading {
    /// Active kcal burned so far on `at`'s calendar day.
    Daily { at: NaiveDateTime, kcal: f64 },
    /// Active kcal summed from the start of `since` up to `at`.
    /// Used for egg incubation when `since` is the pet's creation day.
    SinceDate {
        since: NaiveDate,
        at: NaiveDateTime,
        kcal: f64,
    },
    /// The provider had no data (permission denied, query failed).
    Unavailable { at: NaiveDateTime },
}

impl CalorieReading {
    pub fn at(&self) -> NaiveDateTime {
        match *self {
            Self::Daily { at, .. } | Self::SinceDate { at, .. } | Self::Unavailable { at } => at,
        }
    }
}

/// Bounded FIFO of [`CalorieReading`]s, safe to share between threads.
pub struct CalorieFeed {
    channel: Channel<CriticalSectionRawMutex, CalorieReading, CALORIE_QUEUE_CAP>,
}

impl CalorieFeed {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue a reading.  Returns `false` if the queue is full (reading dropped).
    pub fn push(&self, reading: CalorieReading) -> bool {
        match self.channel.try_send(reading) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                warn!("Calorie feed full, dropping {dropped:?}");
                false
            }
        }
    }

    pub fn pop(&self) -> Option<CalorieReading> {
        self.channel.try_receive().ok()
    }

    /// Drain every pending reading into `handler`, oldest first.
    pub fn drain(&self, mut handler: impl FnMut(CalorieReading)) {
        while let Some(reading) = self.pop() {
            handler(reading);
        }
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl Default for CalorieFeed {
    fn default() -> Self {
        Self::new()
    }
}
