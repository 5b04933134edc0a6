//! Unified error types for the pet core.
//!
//! A single `Error` enum that every subsystem converts into, so the service
//! layer can log any failure uniformly.  None of these are fatal: the pet
//! keeps running on in-memory state whatever happens here.

use core::fmt;

use crate::app::ports::{ConfigError, StorageError};
use crate::fsm::Stage;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The operation is not allowed in the pet's current state.
    InvalidOperation(InvalidOperation),
    /// A save or load against the backing store failed.
    Persistence(StorageError),
    /// Configuration could not be loaded, saved, or validated.
    Config(ConfigError),
    /// The activity source produced no usable value.
    DataUnavailable(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOperation(e) => write!(f, "invalid operation: {e}"),
            Self::Persistence(e) => write!(f, "persistence: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::DataUnavailable(msg) => write!(f, "data unavailable: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Invalid operations
// ---------------------------------------------------------------------------

/// Rejected lifecycle operations.  Reported to the caller, never panicked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidOperation {
    /// The pet is dead; its state is frozen.
    PetDead,
    /// The pet does not yet meet the threshold for leaving this stage.
    NotReady(Stage),
    /// Elder is terminal.
    FinalStage,
}

impl fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PetDead => write!(f, "pet is dead"),
            Self::NotReady(stage) => write!(f, "{} is not ready to evolve", stage.name()),
            Self::FinalStage => write!(f, "already at final stage"),
        }
    }
}

impl core::error::Error for InvalidOperation {}

impl From<InvalidOperation> for Error {
    fn from(e: InvalidOperation) -> Self {
        Self::InvalidOperation(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Persistence(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
