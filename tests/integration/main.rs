//! Integration test harness for host-side testing.
//!
//! Run with: `cargo test --test integration`
//!
//! Drives the full [`Terminal`](rollcall::app::service::Terminal) through
//! mock hardware, without an ESP32 attached.

#![cfg(not(feature = "espidf"))]

mod feed_logger_tests;
mod mock_hw;
mod terminal_tests;
