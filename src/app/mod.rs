//! Application core: pure domain logic, zero I/O.
//!
//! Session lifecycle, presence decisions and task scheduling for the
//! attendance terminal.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
