//! Persistent pet archive.
//!
//! Keeps two postcard blobs under the `"archive"` namespace of a
//! [`StoragePort`]:
//!
//! | key             | value                          |
//! |-----------------|--------------------------------|
//! | `active_pet`    | the current [`Pet`]            |
//! | `longest_lived` | the single [`LongestLivedRecord`] |
//!
//! The record is replaced only by a pet that lived strictly longer; ties
//! keep the older record.

use chrono::NaiveDateTime;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::app::ports::{StorageError, StoragePort};
use crate::fsm::Stage;
use crate::pet::{CauseOfDeath, Emotion, Pet, Species};

pub const ARCHIVE_NAMESPACE: &str = "archive";
pub const ACTIVE_PET_KEY: &str = "active_pet";
pub const LONGEST_LIVED_KEY: &str = "longest_lived";

/// Read buffer size for a single archived blob.
pub const MAX_BLOB_SIZE: usize = 1024;

/// Snapshot of a dead pet, taken at the moment it was archived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongestLivedRecord {
    pub age: u32,
    pub species: Species,
    pub stage: Stage,
    pub emotion: Emotion,
    pub total_calories_consumed: f64,
    pub final_streak: u32,
    pub created_at: NaiveDateTime,
    pub died_at: NaiveDateTime,
    pub cause: CauseOfDeath,
}

impl LongestLivedRecord {
    pub fn from_pet(pet: &Pet, cause: CauseOfDeath, died_at: NaiveDateTime) -> Self {
        Self {
            age: pet.age,
            species: pet.species,
            stage: pet.stage,
            emotion: pet.emotion,
            total_calories_consumed: pet.total_calories_consumed,
            final_streak: pet.streak,
            created_at: pet.created_at,
            died_at,
            cause,
        }
    }

    /// Calendar days between creation and death.
    pub fn lifespan_days(&self) -> i64 {
        (self.died_at.date() - self.created_at.date()).num_days().max(0)
    }

    fn is_of(&self, pet: &Pet) -> bool {
        self.created_at == pet.created_at && self.species == pet.species && self.age == pet.age
    }
}

/// Stateless facade over the archive keys of a [`StoragePort`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PetArchive;

impl PetArchive {
    pub fn new() -> Self {
        Self
    }

    /// The stored active pet, if any.  A blob that fails to decode is
    /// reported as [`StorageError::Corrupted`].
    pub fn load_active(&self, store: &dyn StoragePort) -> Result<Option<Pet>, StorageError> {
        read_blob(store, ACTIVE_PET_KEY)
    }

    pub fn save_pet(&self, store: &mut dyn StoragePort, pet: &Pet) -> Result<(), StorageError> {
        write_blob(store, ACTIVE_PET_KEY, pet)
    }

    /// The current record.  Unreadable records are logged and treated as absent.
    pub fn longest_lived(&self, store: &dyn StoragePort) -> Option<LongestLivedRecord> {
        match read_blob(store, LONGEST_LIVED_KEY) {
            Ok(record) => record,
            Err(e) => {
                warn!("Longest-lived record unreadable ({e}), ignoring");
                None
            }
        }
    }

    /// Return the stored pet if it is alive and active; otherwise create a
    /// fresh egg of `species` and persist it.
    ///
    /// A stored pet that is dead but still flagged active (archival never
    /// finished) is archived with [`CauseOfDeath::Unknown`] first.  Only an
    /// absent, inactive or undecodable blob is replaced (an undecodable one
    /// is deleted up front): any other read error is returned and the
    /// stored pet is left untouched.  Save
    /// failures of the new egg are logged; the egg is returned regardless.
    pub fn get_or_create_active_pet(
        &self,
        store: &mut dyn StoragePort,
        species: Species,
        now: NaiveDateTime,
    ) -> Result<Pet, StorageError> {
        match self.load_active(store) {
            Ok(Some(pet)) if pet.is_active && !pet.is_dead => {
                info!(
                    "Loaded active {} ({}, age {})",
                    pet.species.name(),
                    pet.stage.name(),
                    pet.age
                );
                return Ok(pet);
            }
            Ok(Some(mut pet)) if pet.is_active => {
                warn!("Active pet is dead but was never archived");
                if let Err(e) = self.record_death(store, &mut pet, CauseOfDeath::Unknown, now) {
                    warn!("Late archival failed: {e}");
                }
            }
            Ok(_) => {}
            Err(StorageError::Corrupted) => {
                warn!("Active pet corrupted, starting over");
                if let Err(e) = store.delete(ARCHIVE_NAMESPACE, ACTIVE_PET_KEY) {
                    warn!("Could not remove corrupted pet: {e}");
                }
            }
            Err(e) => {
                warn!("Active pet unreadable ({e}), leaving it in place");
                return Err(e);
            }
        }

        let pet = Pet::new(species, now);
        info!("Created new {} egg", species.name());
        if let Err(e) = self.save_pet(store, &pet) {
            warn!("Failed to persist new pet: {e}");
        }
        Ok(pet)
    }

    /// Archive a dying pet.
    ///
    /// Marks `pet` dead and inactive, replaces the longest-lived record if
    /// `pet` is strictly older (or there is none), then saves `pet`.
    /// Returns whether the record now holds this pet.  Safe to retry after
    /// a failure: a record already written for this pet is not rewritten.
    /// An undecodable record is replaced; a record that cannot be read at
    /// all aborts the call before anything is written.
    pub fn record_death(
        &self,
        store: &mut dyn StoragePort,
        pet: &mut Pet,
        cause: CauseOfDeath,
        now: NaiveDateTime,
    ) -> Result<bool, StorageError> {
        pet.is_dead = true;
        pet.is_active = false;

        let current = match read_blob::<LongestLivedRecord>(store, LONGEST_LIVED_KEY) {
            Ok(record) => record,
            Err(StorageError::Corrupted) => {
                warn!("Longest-lived record corrupted, replacing it");
                None
            }
            Err(e) => return Err(e),
        };
        let replaced = match &current {
            Some(record) if record.is_of(pet) => true,
            Some(record) if pet.age <= record.age => {
                info!(
                    "Pet died at age {} ({cause}); record stays at {}",
                    pet.age, record.age
                );
                false
            }
            _ => {
                let record = LongestLivedRecord::from_pet(pet, cause, now);
                write_blob(store, LONGEST_LIVED_KEY, &record)?;
                info!("New longest-lived record: age {} ({cause})", record.age);
                true
            }
        };

        self.save_pet(store, pet)?;
        Ok(replaced)
    }
}

fn read_blob<T: DeserializeOwned>(
    store: &dyn StoragePort,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let mut buf = [0u8; MAX_BLOB_SIZE];
    let len = match store.read(ARCHIVE_NAMESPACE, key, &mut buf) {
        Ok(len) => len,
        Err(StorageError::NotFound) => return Ok(None),
        Err(e) => return Err(e),
    };
    postcard::from_bytes(&buf[..len])
        .map(Some)
        .map_err(|_| StorageError::Corrupted)
}

fn write_blob<T: Serialize>(
    store: &mut dyn StoragePort,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let bytes = postcard::to_allocvec(value).map_err(|_| StorageError::IoError)?;
    if bytes.len() > MAX_BLOB_SIZE {
        return Err(StorageError::Full);
    }
    store.write(ARCHIVE_NAMESPACE, key, &bytes)
}
