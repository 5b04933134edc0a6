//! Application service — the single owner of the active pet.
//!
//! [`AppService`] wraps the [`PetLifecycle`] and the [`PetArchive`].  It
//! turns calorie readings and [`AppCommand`]s into lifecycle calls, fans the
//! resulting events out to the [`EventSink`] and [`NotificationPort`], and
//! persists through the [`StoragePort`].  All I/O goes through ports passed
//! in at the call site, so the whole service runs against mocks.
//!
//! ```text
//!  CalorieFeed ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │       AppService        │ ──▶ NotificationPort
//!  AppCommand  ──▶ │ Lifecycle · Archive     │ ◀─▶ StoragePort
//!                  └────────────────────────┘
//! ```
//!
//! Saves are lazy: every mutation marks the pet dirty and [`AppService::flush`]
//! writes it.  A failed save leaves the dirty flag set, so the next flush
//! retries.  In-memory state stays authoritative throughout.

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info, warn};

use crate::archive::{LongestLivedRecord, PetArchive};
use crate::config::PetConfig;
use crate::error::Result;
use crate::events::{CalorieFeed, CalorieReading};
use crate::fsm::Stage;
use crate::lifecycle::{PetEvent, PetLifecycle};
use crate::pet::{CauseOfDeath, Pet};

use super::commands::AppCommand;
use super::events::{AppEvent, Notification, PetSnapshot};
use super::ports::{ConfigError, ConfigPort, EventSink, NotificationPort, StoragePort};

/// A death that still has to be written to the archive.
#[derive(Debug, Clone, Copy)]
struct PendingDeath {
    cause: CauseOfDeath,
    at: NaiveDateTime,
}

pub struct AppService {
    lifecycle: PetLifecycle,
    archive: PetArchive,
    pet_dirty: bool,
    pending_death: Option<PendingDeath>,
    config_dirty: bool,
}

impl AppService {
    /// Wrap an already-loaded pet.
    pub fn new(config: PetConfig, pet: Pet) -> Self {
        Self {
            lifecycle: PetLifecycle::new(pet, config),
            archive: PetArchive::new(),
            pet_dirty: false,
            pending_death: None,
            config_dirty: false,
        }
    }

    /// Load (or create) the active pet from `store`.  Fails only when the
    /// stored pet exists but cannot be read right now; nothing is
    /// overwritten in that case.
    pub fn load(
        config: PetConfig,
        store: &mut impl StoragePort,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let archive = PetArchive::new();
        let pet = archive.get_or_create_active_pet(store, config.default_species, now)?;
        Ok(Self::new(config, pet))
    }

    /// Read config from `port`, falling back to defaults when it is missing
    /// or unusable.
    pub fn load_config(port: &impl ConfigPort) -> PetConfig {
        match port.load() {
            Ok(cfg) => cfg,
            Err(ConfigError::NotFound) => {
                info!("No stored config, using defaults");
                PetConfig::default()
            }
            Err(e) => {
                warn!("Stored config rejected ({e}), using defaults");
                PetConfig::default()
            }
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink, now: NaiveDateTime) {
        let snapshot = self.snapshot(now.date());
        info!(
            "AppService started with {} {} (age {})",
            snapshot.species.name(),
            snapshot.stage.name(),
            snapshot.age
        );
        sink.emit(&AppEvent::Started(snapshot));
    }

    // ── Calorie readings ──────────────────────────────────────

    /// Apply every queued reading, then flush.  Returns how many readings
    /// changed the pet.
    pub fn drain_readings(
        &mut self,
        feed: &CalorieFeed,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
        notifier: &mut impl NotificationPort,
        now: NaiveDateTime,
    ) -> usize {
        let mut applied = 0;
        feed.drain(|reading| {
            if self.handle_reading(reading, sink, notifier) {
                applied += 1;
            }
        });
        self.flush(store, sink, now);
        applied
    }

    /// Apply one reading.  Returns `false` if it was ignored or rejected;
    /// the last known calorie value is kept in that case.
    pub fn handle_reading(
        &mut self,
        reading: CalorieReading,
        sink: &mut impl EventSink,
        notifier: &mut impl NotificationPort,
    ) -> bool {
        if self.lifecycle.pet().is_dead {
            return false;
        }
        let result = match reading {
            CalorieReading::Daily { at, kcal } => self.lifecycle.update_calories(kcal, None, at),
            CalorieReading::SinceDate { since, at, kcal } => {
                let pet = self.lifecycle.pet();
                if pet.stage != Stage::Egg || since != pet.created_at.date() {
                    debug!("Ignoring incubation total since {since}");
                    return false;
                }
                let today = if pet.last_calorie_reset_date == at.date() {
                    pet.current_day_calories
                } else {
                    0.0
                };
                self.lifecycle.update_calories(today, Some(kcal), at)
            }
            CalorieReading::Unavailable { at } => {
                warn!(
                    "Calorie data unavailable at {at}, keeping {:.0} kcal",
                    self.lifecycle.pet().current_day_calories
                );
                return false;
            }
        };

        match result {
            Ok(outcome) => {
                self.pet_dirty = true;
                Self::dispatch(&outcome.events, sink, notifier);
                true
            }
            Err(e) => {
                warn!("Calorie reading rejected: {e}");
                false
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply a command at `now`, then flush.  Returns `false` when the
    /// command was rejected (dead pet, not ready, invalid config).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now: NaiveDateTime,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
        notifier: &mut impl NotificationPort,
    ) -> bool {
        let accepted = match cmd {
            AppCommand::Feed => match self.lifecycle.feed(now) {
                Ok(outcome) => {
                    self.pet_dirty = true;
                    Self::dispatch(&outcome.events, sink, notifier);
                    true
                }
                Err(e) => {
                    warn!("Feed rejected: {e}");
                    false
                }
            },
            AppCommand::Evolve => match self.lifecycle.evolve() {
                Ok(outcome) => {
                    self.pet_dirty = true;
                    Self::dispatch(&outcome.events, sink, notifier);
                    true
                }
                Err(e) => {
                    info!("Evolve rejected: {e}");
                    false
                }
            },
            AppCommand::CheckHealth => {
                let report = self.lifecycle.check_health(now);
                if report.missed_days > 0 || report.died() {
                    self.pet_dirty = true;
                }
                Self::dispatch(&report.events, sink, notifier);
                if let Some(cause) = report.cause() {
                    self.pending_death = Some(PendingDeath { cause, at: now });
                }
                true
            }
            AppCommand::UpdateConfig(config) => match self.lifecycle.set_config(config) {
                Ok(()) => {
                    self.config_dirty = true;
                    info!("Configuration updated at runtime");
                    true
                }
                Err(e) => {
                    warn!("Config update rejected: {e}");
                    false
                }
            },
            #[cfg(any(debug_assertions, feature = "debug-tools"))]
            AppCommand::ForceEvolve => match self.lifecycle.force_evolve() {
                Ok(outcome) => {
                    self.pet_dirty = true;
                    Self::dispatch(&outcome.events, sink, notifier);
                    true
                }
                Err(e) => {
                    info!("Force-evolve rejected: {e}");
                    false
                }
            },
        };
        self.flush(store, sink, now);
        accepted
    }

    // ── Persistence ───────────────────────────────────────────

    /// Write pending state: archive a dead pet (then hatch a replacement
    /// egg), or save the dirty pet.  Returns `true` when nothing is left
    /// pending.
    pub fn flush(
        &mut self,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
        now: NaiveDateTime,
    ) -> bool {
        if let Some(death) = self.pending_death {
            let pet = self.lifecycle.pet_mut();
            match self.archive.record_death(store, pet, death.cause, death.at) {
                Ok(replaced) => {
                    let age = pet.age;
                    self.pending_death = None;
                    self.pet_dirty = false;
                    if replaced {
                        sink.emit(&AppEvent::RecordSet {
                            age,
                            cause: death.cause,
                        });
                    }
                    let species = self.lifecycle.config().default_species;
                    let fresh = match self.archive.get_or_create_active_pet(store, species, now) {
                        Ok(pet) => pet,
                        Err(e) => {
                            // The dead pet is already stored inactive; the
                            // dirty egg is written over it below.
                            warn!("Could not reload active pet after death: {e}");
                            sink.emit(&AppEvent::PersistenceFailed(e));
                            self.pet_dirty = true;
                            Pet::new(species, now)
                        }
                    };
                    self.lifecycle.replace_pet(fresh);
                    sink.emit(&AppEvent::NewPet(self.snapshot(now.date())));
                }
                Err(e) => {
                    warn!("Archiving dead pet failed: {e}");
                    sink.emit(&AppEvent::PersistenceFailed(e));
                    return false;
                }
            }
        }

        if self.pet_dirty {
            match self.archive.save_pet(store, self.lifecycle.pet()) {
                Ok(()) => {
                    self.pet_dirty = false;
                    debug!("Pet saved");
                }
                Err(e) => {
                    warn!("Pet save failed: {e}");
                    sink.emit(&AppEvent::PersistenceFailed(e));
                    return false;
                }
            }
        }
        true
    }

    /// Persist the config if a runtime update changed it.
    /// Returns `true` if the config was saved.
    pub fn save_config_if_dirty(&mut self, port: &impl ConfigPort) -> bool {
        if !self.config_dirty {
            return false;
        }
        match port.save(self.lifecycle.config()) {
            Ok(()) => {
                self.config_dirty = false;
                info!("Config saved");
                true
            }
            Err(e) => {
                warn!("Config save failed: {e}");
                false
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self, today: NaiveDate) -> PetSnapshot {
        self.lifecycle.snapshot(today)
    }

    pub fn pet(&self) -> &Pet {
        self.lifecycle.pet()
    }

    pub fn config(&self) -> &PetConfig {
        self.lifecycle.config()
    }

    pub fn is_ready_to_evolve(&self) -> bool {
        self.lifecycle.is_ready_to_evolve()
    }

    pub fn longest_lived(&self, store: &impl StoragePort) -> Option<LongestLivedRecord> {
        self.archive.longest_lived(store)
    }

    /// Whether anything is waiting to be written.
    pub fn is_dirty(&self) -> bool {
        self.pet_dirty || self.pending_death.is_some()
    }

    pub fn is_config_dirty(&self) -> bool {
        self.config_dirty
    }

    // ── Internal ──────────────────────────────────────────────

    fn dispatch(
        events: &[PetEvent],
        sink: &mut impl EventSink,
        notifier: &mut impl NotificationPort,
    ) {
        for event in events {
            sink.emit(&AppEvent::Pet(*event));
            if let Some(n) = Notification::from_pet_event(event) {
                notifier.notify(&n);
            }
        }
    }
}
