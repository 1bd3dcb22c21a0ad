//! Identity registry: which card identifiers belong to whom.
//!
//! Built once at boot from the provisioned roster and immutable afterwards.
//! Each identity gets a stable ordinal (its position in the roster) which
//! indexes the presence table.  Lookup goes through a hashed map built at
//! construction, so a scan never walks the roster or compares formatted
//! text more than once.
//!
//! Identifiers and names travel inside the comma-separated serial feed, so
//! both are rejected if they contain `,` or a line break.

use core::fmt;

use heapless::{FnvIndexMap, String, Vec};
use serde::Deserialize;

/// Maximum number of identities the terminal can hold.
/// Power of two: required by the hashed index.
pub const MAX_IDENTITIES: usize = 32;

/// Maximum identifier length in bytes (`"04 AB CD EF 12 34 56"` fits).
pub const MAX_ID_LEN: usize = 32;

/// Maximum display-name length in bytes.
pub const MAX_NAME_LEN: usize = 24;

/// Opaque card identifier as produced by the reader driver.
pub type CardUid = String<MAX_ID_LEN>;

/// Human-readable name shown on the display and written to the feed.
pub type DisplayName = String<MAX_NAME_LEN>;

/// Stable ordinal of an identity within the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityIndex(u8);

impl IdentityIndex {
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

/// One registered card holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: CardUid,
    pub name: DisplayName,
    pub index: IdentityIndex,
}

/// Why a roster could not be turned into a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// More than [`MAX_IDENTITIES`] entries.
    Full,
    /// The same identifier appears twice.
    DuplicateId(CardUid),
    /// Empty identifier or name.
    Empty,
    /// Identifier longer than [`MAX_ID_LEN`].
    IdTooLong,
    /// Name longer than [`MAX_NAME_LEN`].
    NameTooLong,
    /// Identifier or name contains `,`, `\r` or `\n`.
    ForbiddenCharacter,
    /// Roster JSON could not be parsed.
    Json,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "roster exceeds {MAX_IDENTITIES} identities"),
            Self::DuplicateId(id) => write!(f, "duplicate identifier '{id}'"),
            Self::Empty => write!(f, "empty identifier or name"),
            Self::IdTooLong => write!(f, "identifier longer than {MAX_ID_LEN} bytes"),
            Self::NameTooLong => write!(f, "name longer than {MAX_NAME_LEN} bytes"),
            Self::ForbiddenCharacter => write!(f, "identifier or name contains ',' or a line break"),
            Self::Json => write!(f, "roster JSON is malformed"),
        }
    }
}

/// Roster entry as provisioned (JSON: `{"id": "...", "name": "..."}`).
#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    pub id: std::string::String,
    pub name: std::string::String,
}

/// The immutable identity registry.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    identities: Vec<Identity, MAX_IDENTITIES>,
    by_id: FnvIndexMap<CardUid, IdentityIndex, MAX_IDENTITIES>,
}

impl Registry {
    /// Registry with no identities; every scan is unauthorized.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from `(identifier, name)` pairs.  Ordinals follow input order.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut registry = Self::empty();
        for (id, name) in pairs {
            registry.push(id, name)?;
        }
        Ok(registry)
    }

    /// Parse a JSON roster: `[{"id": "04 AB CD EF", "name": "Ada"}, ...]`.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let entries: std::vec::Vec<RosterEntry> =
            serde_json::from_str(json).map_err(|_| RegistryError::Json)?;
        Self::from_pairs(entries.iter().map(|e| (e.id.as_str(), e.name.as_str())))
    }

    fn push(&mut self, id: &str, name: &str) -> Result<(), RegistryError> {
        let id = id.trim();
        let name = name.trim();
        if id.is_empty() || name.is_empty() {
            return Err(RegistryError::Empty);
        }
        if [id, name].iter().any(|s| s.contains([',', '\r', '\n'])) {
            return Err(RegistryError::ForbiddenCharacter);
        }
        let uid = CardUid::try_from(id).map_err(|()| RegistryError::IdTooLong)?;
        let name = DisplayName::try_from(name).map_err(|()| RegistryError::NameTooLong)?;

        if self.by_id.contains_key(&uid) {
            return Err(RegistryError::DuplicateId(uid));
        }
        if self.identities.is_full() {
            return Err(RegistryError::Full);
        }

        let index = IdentityIndex(self.identities.len() as u8);
        self.by_id
            .insert(uid.clone(), index)
            .map_err(|_| RegistryError::Full)?;
        self.identities
            .push(Identity {
                id: uid,
                name,
                index,
            })
            .map_err(|_| RegistryError::Full)?;
        Ok(())
    }

    /// Exact-match lookup.  Identifiers too long to be registered are
    /// simply unknown.
    pub fn lookup(&self, id: &str) -> Option<&Identity> {
        let key = CardUid::try_from(id).ok()?;
        let index = self.by_id.get(&key)?;
        self.identities.get(index.get())
    }

    pub fn get(&self, index: IdentityIndex) -> Option<&Identity> {
        self.identities.get(index.get())
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.identities.iter()
    }
}
