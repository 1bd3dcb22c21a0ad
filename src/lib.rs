//! Rollcall attendance terminal firmware library.
//!
//! Exposes the control core, drivers and adapters for the firmware binary
//! and for host-side integration testing.  All ESP-IDF-specific code is
//! guarded by `#[cfg(feature = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod edge;
pub mod error;
pub mod feed;
pub mod fsm;
pub mod gate;
pub mod indicator;
pub mod logger;
pub mod pins;
pub mod presence;
pub mod registry;
pub mod scheduler;
pub mod timing;

pub use error::{Error, Result};
