//! Application core — pet orchestration with all I/O behind ports.
//!
//! The [`service::AppService`] owns the lifecycle, drains calorie readings,
//! applies [`commands::AppCommand`]s and reports through the traits in
//! [`ports`].  Nothing in here knows about files or the system clock.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
