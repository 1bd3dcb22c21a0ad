//! Serial event feed codec.
//!
//! Wire format, one ASCII line per event, `\n` terminated:
//! ```text
//! NEW_SESSION
//! LOGIN:<identifier>,<name>
//! LOGOUT:<identifier>,<name>
//! ```
//!
//! Identifiers and names never contain `,` or line breaks (the registry
//! rejects them), so the payload splits unambiguously.  The parser also
//! accepts `LOG:` as a login prefix, as emitted by older terminals.

use core::fmt;

use crate::app::events::TerminalEvent;

pub const NEW_SESSION: &str = "NEW_SESSION";
pub const LOGIN_PREFIX: &str = "LOGIN:";
pub const LOGOUT_PREFIX: &str = "LOGOUT:";
/// Login prefix used by older terminals.
pub const LEGACY_LOGIN_PREFIX: &str = "LOG:";

/// One decoded feed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRecord {
    NewSession,
    Login { id: String, name: String },
    Logout { id: String, name: String },
}

/// Why a line could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// Known prefix, but the payload is not exactly `<id>,<name>`.
    Malformed,
    /// Blank line or no known prefix.
    Unrecognized,
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed feed payload"),
            Self::Unrecognized => write!(f, "unrecognized feed line"),
        }
    }
}

impl FeedRecord {
    /// Feed record for a terminal event; `None` for local-only events.
    pub fn from_event(event: &TerminalEvent) -> Option<Self> {
        match event {
            TerminalEvent::SessionStarted => Some(Self::NewSession),
            TerminalEvent::Login { id, name } => Some(Self::Login {
                id: id.as_str().into(),
                name: name.as_str().into(),
            }),
            TerminalEvent::Logout { id, name } => Some(Self::Logout {
                id: id.as_str().into(),
                name: name.as_str().into(),
            }),
            TerminalEvent::Started
            | TerminalEvent::SessionEnded
            | TerminalEvent::Rejected { .. } => None,
        }
    }

    /// Decode one line.  Surrounding whitespace (including `\r`) is ignored.
    pub fn parse(line: &str) -> Result<Self, FeedError> {
        let line = line.trim();
        if line == NEW_SESSION {
            return Ok(Self::NewSession);
        }
        if let Some(payload) = line.strip_prefix(LOGOUT_PREFIX) {
            let (id, name) = split_payload(payload)?;
            return Ok(Self::Logout { id, name });
        }
        if let Some(payload) = line
            .strip_prefix(LOGIN_PREFIX)
            .or_else(|| line.strip_prefix(LEGACY_LOGIN_PREFIX))
        {
            let (id, name) = split_payload(payload)?;
            return Ok(Self::Login { id, name });
        }
        Err(FeedError::Unrecognized)
    }

    /// Display name carried by the record, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::NewSession => None,
            Self::Login { name, .. } | Self::Logout { name, .. } => Some(name.as_str()),
        }
    }
}

/// `<id>,<name>` with exactly one comma; both halves trimmed.
fn split_payload(payload: &str) -> Result<(String, String), FeedError> {
    let mut parts = payload.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(name), None) => Ok((id.trim().into(), name.trim().into())),
        _ => Err(FeedError::Malformed),
    }
}

/// The wire line, without the terminator.
impl fmt::Display for FeedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewSession => f.write_str(NEW_SESSION),
            Self::Login { id, name } => write!(f, "{LOGIN_PREFIX}{id},{name}"),
            Self::Logout { id, name } => write!(f, "{LOGOUT_PREFIX}{id},{name}"),
        }
    }
}
