//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one subsystem against
//! the mock ports in `mock_ports`.  Everything runs on the host with a
//! fixed calendar, no wall clock involved.

mod archive_tests;
mod lifecycle_scenarios;
mod mock_ports;
