//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter        | Implements         | Connects to               |
//! |----------------|--------------------|---------------------------|
//! | `clock`        | ClockPort          | chrono::Local / manual    |
//! | `file_store`   | StoragePort        | files under a directory   |
//! |                | ConfigPort         | config.json               |
//! | `log_sink`     | EventSink          | log facade                |
//! | `memory_store` | StoragePort        | in-memory map             |
//! |                | ConfigPort         |                           |
//! | `notifier`     | NotificationPort   | log facade                |

pub mod clock;
pub mod file_store;
pub mod log_sink;
pub mod memory_store;
pub mod notifier;
