//! Fuzz target: archive blob decoding
//!
//! Plants arbitrary bytes under the archive keys and drives the load
//! paths, verifying:
//! - No panics on any stored bytes
//! - `get_or_create_active_pet` hands back a live, active pet unless the
//!   read itself failed
//! - `record_death` on that pet never leaves it alive
//!
//! cargo fuzz run fuzz_pet_blob

#![no_main]

use chrono::DateTime;
use libfuzzer_sys::fuzz_target;
use fitpet::adapters::memory_store::MemoryStore;
use fitpet::app::ports::StoragePort;
use fitpet::archive::{ACTIVE_PET_KEY, ARCHIVE_NAMESPACE, LONGEST_LIVED_KEY, PetArchive};
use fitpet::pet::{CauseOfDeath, Species};

fuzz_target!(|data: &[u8]| {
    let split = data.first().map_or(0, |&b| b as usize).min(data.len());
    let (pet_bytes, record_bytes) = data.split_at(split);

    let mut store = MemoryStore::new();
    let _ = store.write(ARCHIVE_NAMESPACE, ACTIVE_PET_KEY, pet_bytes);
    let _ = store.write(ARCHIVE_NAMESPACE, LONGEST_LIVED_KEY, record_bytes);

    let Some(now) = DateTime::from_timestamp(1_750_000_000, 0).map(|t| t.naive_utc()) else {
        return;
    };
    let archive = PetArchive::new();

    let _ = archive.load_active(&store);
    let _ = archive.longest_lived(&store);

    let Ok(mut pet) = archive.get_or_create_active_pet(&mut store, Species::Fufufafa, now) else {
        return;
    };
    assert!(pet.is_active && !pet.is_dead);

    let _ = archive.record_death(&mut store, &mut pet, CauseOfDeath::Unknown, now);
    assert!(pet.is_dead && !pet.is_active);
});
