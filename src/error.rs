//! Unified error types for the terminal firmware.
//!
//! Every subsystem error converts into [`Error`], keeping boot-time wiring
//! uniform.  The control loop itself has no fatal path: ports log these
//! and degrade.

use core::fmt;

use crate::app::ports::ConfigError;
use crate::feed::FeedError;
use crate::registry::RegistryError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Card reader could not be reached or misbehaved.
    Reader(ReaderError),
    /// Text or segment display write failed.
    Display(DisplayError),
    /// Roster rejected.
    Registry(RegistryError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// Feed line could not be decoded.
    Feed(FeedError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reader(e) => write!(f, "reader: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Feed(e) => write!(f, "feed: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<FeedError> for Error {
    fn from(e: FeedError) -> Self {
        Self::Feed(e)
    }
}

// ---------------------------------------------------------------------------
// Reader errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderError {
    /// SPI transfer failed.
    Spi,
    /// Version register reads 0x00/0xFF: no chip on the bus.
    NotDetected,
    /// No answer before the chip timer ran out (usually: no card).
    Timeout,
    /// Parity, protocol or buffer overflow error flagged by the chip.
    Protocol,
    /// More than one card answered.
    Collision,
    /// Fewer bytes than the command expects.
    ShortFrame,
    /// UID block check character mismatch.
    BadChecksum,
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi => write!(f, "SPI transfer failed"),
            Self::NotDetected => write!(f, "reader not detected"),
            Self::Timeout => write!(f, "no response"),
            Self::Protocol => write!(f, "protocol error"),
            Self::Collision => write!(f, "card collision"),
            Self::ShortFrame => write!(f, "short frame"),
            Self::BadChecksum => write!(f, "UID checksum mismatch"),
        }
    }
}

impl From<ReaderError> for Error {
    fn from(e: ReaderError) -> Self {
        Self::Reader(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// I²C write to the backpack failed.
    Bus,
    /// GPIO write failed.
    Pin,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C write failed"),
            Self::Pin => write!(f, "GPIO write failed"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
