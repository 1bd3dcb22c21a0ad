//! Peripheral drivers.  Each is generic over `embedded-hal` 1.0 traits and
//! implements one port from [`crate::app::ports`].

pub mod button;
pub mod indicator_leds;
pub mod lcd;
pub mod rfid;
pub mod segment;
