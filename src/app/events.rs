//! Outbound terminal events.
//!
//! The [`Terminal`](super::service::Terminal) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Only `SessionStarted`,
//! `Login` and `Logout` belong on the serial feed; the rest are for local
//! logging.

use crate::registry::{CardUid, DisplayName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// The control loop is up (boot, Idle).
    Started,

    /// Idle → Active.  Feed: `NEW_SESSION`.
    SessionStarted,

    /// Active → Idle on countdown expiry.
    SessionEnded,

    /// Known card, was outside.  Feed: `LOGIN:<id>,<name>`.
    Login { id: CardUid, name: DisplayName },

    /// Known card, was inside.  Feed: `LOGOUT:<id>,<name>`.
    Logout { id: CardUid, name: DisplayName },

    /// Unknown card, or a read that produced no identifier.
    Rejected { id: Option<CardUid> },
}

impl TerminalEvent {
    /// Whether this event has a serial feed line.
    pub fn is_feed_event(&self) -> bool {
        matches!(
            self,
            Self::SessionStarted | Self::Login { .. } | Self::Logout { .. }
        )
    }
}
