//! Mock ports for integration tests.
//!
//! Records every event and notification so tests can assert on the full
//! history, and lets a test break the store mid-run.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fitpet::app::events::{AppEvent, Notification};
use fitpet::app::ports::{ClockPort, EventSink, NotificationPort, StorageError, StoragePort};
use std::cell::Cell;
use std::collections::HashMap;

// ── MockStore ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockStore {
    data: HashMap<String, Vec<u8>>,
    pub fail_writes: bool,
    pub fail_reads: bool,
    pub writes: usize,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a raw blob, bypassing `fail_writes`.
    pub fn poke(&mut self, ns: &str, key: &str, bytes: &[u8]) {
        self.data.insert(format!("{ns}::{key}"), bytes.to_vec());
    }

    pub fn raw(&self, ns: &str, key: &str) -> Option<&[u8]> {
        self.data.get(&format!("{ns}::{key}")).map(Vec::as_slice)
    }
}

impl StoragePort for MockStore {
    fn read(&self, ns: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        if self.fail_reads {
            return Err(StorageError::IoError);
        }
        let data = self.raw(ns, key).ok_or(StorageError::NotFound)?;
        if data.len() > buf.len() {
            return Err(StorageError::Full);
        }
        buf[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    fn write(&mut self, ns: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        self.writes += 1;
        self.poke(ns, key, data);
        Ok(())
    }

    fn delete(&mut self, ns: &str, key: &str) -> Result<(), StorageError> {
        self.data.remove(&format!("{ns}::{key}"));
        Ok(())
    }

    fn exists(&self, ns: &str, key: &str) -> bool {
        self.data.contains_key(&format!("{ns}::{key}"))
    }
}

// ── Recording sinks ───────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Vec<Notification>,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn categories(&self) -> Vec<&'static str> {
        self.sent.iter().map(Notification::category).collect()
    }
}

impl NotificationPort for RecordingNotifier {
    fn notify(&mut self, notification: &Notification) {
        self.sent.push(*notification);
    }
}

// ── Calendar ──────────────────────────────────────────────────

/// 09:00 on the `n`th day after 2025-01-01.
pub fn day(n: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
        + Duration::days(n)
}

/// Manually stepped clock.
pub struct StepClock(Cell<NaiveDateTime>);

#[allow(dead_code)]
impl StepClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self(Cell::new(start))
    }

    pub fn next_day(&self) {
        self.0.set(self.0.get() + Duration::days(1));
    }
}

impl ClockPort for StepClock {
    fn now(&self) -> NaiveDateTime {
        self.0.get()
    }
}
