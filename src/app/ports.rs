//! Port traits — the boundary between pet logic and the host.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Storage, clocks, event sinks and notifiers implement these traits.  The
//! [`AppService`](super::service::AppService) takes them as parameters, so
//! the lifecycle never touches the filesystem or the wall clock directly.
//!
//! All port errors are typed and none of them are fatal: the service logs
//! them and keeps running on in-memory state.

use chrono::NaiveDateTime;

use super::events::{AppEvent, Notification};
use crate::config::PetConfig;

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / UI)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.  Adapters
/// decide where they go (log, UI redraw, telemetry).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Notification port (domain → user-facing alerts)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget user notifications.  Nothing is read back.
pub trait NotificationPort {
    fn notify(&mut self, notification: &Notification);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Local wall-clock time.  Calendar-day rules use `now().date()`.
pub trait ClockPort {
    fn now(&self) -> NaiveDateTime;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists [`PetConfig`].
///
/// Implementations MUST validate before persisting and reject out-of-range
/// values with [`ConfigError::ValidationFailed`] rather than clamping.
pub trait ConfigPort {
    /// Load configuration.  Returns [`ConfigError::NotFound`] on first run.
    fn load(&self) -> Result<PetConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &PetConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (domain ↔ flash / disk)
// ───────────────────────────────────────────────────────────────

/// Namespaced key-value blob storage for pets and the longest-lived record.
///
/// Writes MUST be atomic: a reader sees either the old blob or the new one.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config stored yet.
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted,
    /// A field failed range validation.  The message names the field.
    ValidationFailed(&'static str),
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    NotFound,
    /// Backend is full, or the value exceeds the caller's buffer.
    Full,
    IoError,
    /// Blob exists but does not decode.
    Corrupted,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
            Self::Corrupted => write!(f, "stored value corrupted"),
        }
    }
}

impl core::error::Error for ConfigError {}
impl core::error::Error for StorageError {}
