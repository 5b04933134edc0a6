//! Archive behaviour against a mock store: record replacement, retries,
//! and damaged blobs.

use super::mock_ports::{MockStore, day};

use fitpet::app::ports::{StorageError, StoragePort};
use fitpet::archive::{
    ACTIVE_PET_KEY, ARCHIVE_NAMESPACE, LONGEST_LIVED_KEY, MAX_BLOB_SIZE, PetArchive,
};
use fitpet::fsm::Stage;
use fitpet::pet::{CauseOfDeath, Pet, Species};

fn pet_aged(created: i64, age: u32) -> Pet {
    let mut pet = Pet::new(Species::Fufufafa, day(created));
    pet.age = age;
    pet.stage = Stage::Adult;
    pet
}

#[test]
fn record_replaced_only_by_strictly_longer_life() {
    let archive = PetArchive::new();
    let mut store = MockStore::new();

    let mut first = pet_aged(0, 50);
    assert_eq!(
        archive.record_death(&mut store, &mut first, CauseOfDeath::OldAge, day(50)),
        Ok(true)
    );

    let mut tie = pet_aged(60, 50);
    assert_eq!(
        archive.record_death(&mut store, &mut tie, CauseOfDeath::Neglected, day(110)),
        Ok(false)
    );
    assert_eq!(archive.longest_lived(&store).unwrap().created_at, day(0));

    let mut longer = pet_aged(120, 51);
    assert_eq!(
        archive.record_death(&mut store, &mut longer, CauseOfDeath::Neglected, day(171)),
        Ok(true)
    );

    let record = archive.longest_lived(&store).unwrap();
    assert_eq!(record.age, 51);
    assert_eq!(record.cause, CauseOfDeath::Neglected);
    assert_eq!(record.died_at, day(171));
}

#[test]
fn record_death_retry_after_write_failure() {
    let archive = PetArchive::new();
    let mut store = MockStore::new();
    let mut pet = pet_aged(0, 12);

    store.fail_writes = true;
    assert_eq!(
        archive.record_death(&mut store, &mut pet, CauseOfDeath::Neglected, day(15)),
        Err(StorageError::IoError)
    );
    assert!(pet.is_dead);
    assert!(!pet.is_active);
    assert!(archive.longest_lived(&store).is_none());

    store.fail_writes = false;
    assert_eq!(
        archive.record_death(&mut store, &mut pet, CauseOfDeath::Neglected, day(15)),
        Ok(true)
    );
    assert_eq!(store.writes, 2);

    // A second retry recognises its own record and only re-saves the pet.
    assert_eq!(
        archive.record_death(&mut store, &mut pet, CauseOfDeath::Neglected, day(16)),
        Ok(true)
    );
    assert_eq!(store.writes, 3);
    assert_eq!(archive.longest_lived(&store).unwrap().died_at, day(15));

    let stored = archive.load_active(&store).unwrap().unwrap();
    assert!(stored.is_dead && !stored.is_active);
}

#[test]
fn corrupted_record_is_treated_as_absent() {
    let archive = PetArchive::new();
    let mut store = MockStore::new();
    store.poke(ARCHIVE_NAMESPACE, LONGEST_LIVED_KEY, &[0xff; 7]);

    assert!(archive.longest_lived(&store).is_none());
    let mut pet = pet_aged(0, 3);
    assert_eq!(archive.record_death(&mut store, &mut pet, CauseOfDeath::OldAge, day(3)), Ok(true));
    assert_eq!(archive.longest_lived(&store).unwrap().age, 3);
}

#[test]
fn unreadable_record_is_never_overwritten() {
    let archive = PetArchive::new();
    let mut store = MockStore::new();
    let mut elder = pet_aged(0, 50);
    archive
        .record_death(&mut store, &mut elder, CauseOfDeath::OldAge, day(50))
        .unwrap();

    let mut pet = pet_aged(60, 10);
    store.fail_reads = true;
    assert_eq!(
        archive.record_death(&mut store, &mut pet, CauseOfDeath::Neglected, day(70)),
        Err(StorageError::IoError)
    );
    assert_eq!(store.writes, 2);

    store.fail_reads = false;
    assert_eq!(archive.longest_lived(&store).unwrap().age, 50);
    assert_eq!(
        archive.record_death(&mut store, &mut pet, CauseOfDeath::Neglected, day(70)),
        Ok(false)
    );
}

#[test]
fn corrupted_active_pet_starts_over() {
    let archive = PetArchive::new();
    let mut store = MockStore::new();
    store.poke(ARCHIVE_NAMESPACE, ACTIVE_PET_KEY, b"not a pet");
    assert_eq!(archive.load_active(&store), Err(StorageError::Corrupted));

    let pet = archive
        .get_or_create_active_pet(&mut store, Species::Sparkle, day(4))
        .unwrap();
    assert_eq!((pet.species, pet.stage, pet.age), (Species::Sparkle, Stage::Egg, 0));
    assert_eq!(archive.load_active(&store).unwrap(), Some(pet));
}

#[test]
fn corrupted_active_pet_is_removed_even_if_egg_save_fails() {
    let archive = PetArchive::new();
    let mut store = MockStore::new();
    store.poke(ARCHIVE_NAMESPACE, ACTIVE_PET_KEY, b"not a pet");
    store.fail_writes = true;

    let pet = archive
        .get_or_create_active_pet(&mut store, Species::Bubbles, day(4))
        .unwrap();
    assert_eq!(pet.stage, Stage::Egg);
    assert!(!store.exists(ARCHIVE_NAMESPACE, ACTIVE_PET_KEY));
}

#[test]
fn oversized_active_pet_is_left_in_place() {
    let archive = PetArchive::new();
    let mut store = MockStore::new();
    let blob = [0u8; MAX_BLOB_SIZE + 1];
    store.poke(ARCHIVE_NAMESPACE, ACTIVE_PET_KEY, &blob);

    assert_eq!(
        archive.get_or_create_active_pet(&mut store, Species::Bubbles, day(4)),
        Err(StorageError::Full)
    );
    assert_eq!(store.raw(ARCHIVE_NAMESPACE, ACTIVE_PET_KEY), Some(&blob[..]));
    assert_eq!(store.writes, 0);
}

#[test]
fn failed_read_never_overwrites_living_pet() {
    let archive = PetArchive::new();
    let mut store = MockStore::new();
    let mut pet = pet_aged(0, 200);
    pet.streak = 180;
    archive.save_pet(&mut store, &pet).unwrap();

    store.fail_reads = true;
    assert_eq!(
        archive.get_or_create_active_pet(&mut store, Species::Sparkle, day(201)),
        Err(StorageError::IoError)
    );
    assert_eq!(store.writes, 1);

    store.fail_reads = false;
    let stored = archive.load_active(&store).unwrap().unwrap();
    assert_eq!(stored, pet);
    assert_eq!(stored.age, 200);
}

#[test]
fn alive_pet_is_loaded_not_replaced() {
    let archive = PetArchive::new();
    let mut store = MockStore::new();
    let mut pet = Pet::new(Species::Kikimora, day(0));
    pet.age = 9;
    pet.stage = Stage::Child;
    archive.save_pet(&mut store, &pet).unwrap();

    let loaded = archive
        .get_or_create_active_pet(&mut store, Species::Fufufafa, day(10))
        .unwrap();
    assert_eq!(loaded, pet);
    assert_eq!(store.writes, 1);
}

#[test]
fn new_pet_returned_even_when_save_fails() {
    let archive = PetArchive::new();
    let mut store = MockStore::new();
    store.fail_writes = true;

    let pet = archive
        .get_or_create_active_pet(&mut store, Species::Fufufafa, day(0))
        .unwrap();
    assert_eq!(pet.stage, Stage::Egg);
    assert!(!store.exists(ARCHIVE_NAMESPACE, ACTIVE_PET_KEY));
}
