//! fitpet — activity-driven virtual pet core.
//!
//! A pet hatches from calories burned, ages one day per fed day, evolves
//! through six stages, and dies of neglect or old age.  The longest-lived
//! pet is kept on record.
//!
//! ```text
//!  pet ─── fsm (EvolutionPolicy) ─── lifecycle (PetLifecycle)
//!                                        │
//!  archive (PetArchive) ─────────── app::service (AppService) ── adapters
//!                                        │
//!                          events (CalorieFeed) ◀── provider
//! ```
//!
//! The core is synchronous and does no I/O; storage, clocks and
//! notifications live behind the traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod archive;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod lifecycle;
pub mod pet;

pub use error::{Error, InvalidOperation, Result};
