//! Port traits: the hexagonal boundary between the terminal core and the
//! outside world.
//!
//! ```text
//!   Driver/Adapter ──▶ Port trait ──▶ Terminal (domain)
//! ```
//!
//! Drivers (reader, displays, indicator lines, button) and adapters (event
//! sink, storage) implement these traits.  The
//! [`Terminal`](super::service::Terminal) consumes them through generics,
//! so the domain core never touches hardware directly and every port can
//! be replaced by a recording mock in tests.
//!
//! Ports are infallible from the core's point of view: an implementation
//! that hits a bus error logs it and degrades (a failed reader transfer
//! reads as "no card", a failed display write is dropped).

use core::fmt;

use crate::config::TerminalConfig;
use crate::registry::{CardUid, Registry, RegistryError};

use super::events::TerminalEvent;

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond counter since power-on.  Wraps at `u32::MAX`;
/// every consumer compares timestamps with wrapping subtraction.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Card reader (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

pub trait ReaderPort {
    /// Is a card in the field right now?
    fn card_present(&mut self) -> bool;

    /// Read the identifier of the card in the field.  `None` means the
    /// read failed; the caller treats that as an unauthorized scan.
    fn read_identifier(&mut self) -> Option<CardUid>;
}

// ───────────────────────────────────────────────────────────────
// Output ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Two-row text display.  Fitting text to the panel width is the
/// implementation's job.
pub trait TextDisplayPort {
    fn clear(&mut self);
    fn write_line(&mut self, row: u8, text: &str);

    /// Clear and write both rows.
    fn show(&mut self, top: &str, bottom: &str) {
        self.clear();
        self.write_line(0, top);
        self.write_line(1, bottom);
    }
}

/// Four-digit numeric readout.
pub trait NumericDisplayPort {
    /// Show a value as four digits with the centre colon lit (MM:SS when
    /// fed `minutes * 100 + seconds`).
    fn show_value(&mut self, value: u16);
    /// Show the "no session" placeholder.
    fn show_placeholder(&mut self);
}

/// Success and error indicator lines.
pub trait IndicatorPort {
    fn set_success(&mut self, on: bool);
    fn set_error(&mut self, on: bool);
}

/// Session start input, sampled as a level once per tick.
pub trait SessionInputPort {
    fn start_pressed(&mut self) -> bool;
}

/// Everything the terminal needs from the board, as one bound.
pub trait TerminalHardware:
    ReaderPort + TextDisplayPort + NumericDisplayPort + IndicatorPort + SessionInputPort
{
}

impl<T> TerminalHardware for T where
    T: ReaderPort + TextDisplayPort + NumericDisplayPort + IndicatorPort + SessionInputPort
{
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → serial feed / logging)
// ───────────────────────────────────────────────────────────────

/// The terminal emits structured [`TerminalEvent`]s through this port.
/// Adapters decide where they go (serial feed, log, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &TerminalEvent);
}

// ───────────────────────────────────────────────────────────────
// Persistence ports
// ───────────────────────────────────────────────────────────────

/// Loads and persists terminal configuration.
///
/// Implementations MUST validate before persisting; invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], never clamped.
pub trait ConfigPort {
    /// Returns [`TerminalConfig::default()`] if nothing is stored.
    fn load(&self) -> Result<TerminalConfig, ConfigError>;

    fn save(&self, config: &TerminalConfig) -> Result<(), ConfigError>;
}

/// Loads the identity roster.
pub trait RosterPort {
    /// Returns an empty registry if no roster is stored.
    fn load_roster(&self) -> Result<Registry, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] and [`RosterPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored blob failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// The stored roster was rejected by the registry.
    Roster(RegistryError),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Roster(e) => write!(f, "roster rejected: {e}"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<RegistryError> for ConfigError {
    fn from(e: RegistryError) -> Self {
        Self::Roster(e)
    }
}
