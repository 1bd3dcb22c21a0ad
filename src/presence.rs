//! Presence/access engine.
//!
//! Turns a scanned identifier into one of three outcomes:
//!
//! ```text
//!   scan(id) ──▶ registry lookup ──┬── unknown ──────────────▶ Unauthorized
//!                                  │
//!                                  ├── known, Outside ──▶ Inside  ─▶ Login
//!                                  └── known, Inside  ──▶ Outside ─▶ Logout
//! ```
//!
//! The same card alternates between login and logout on successive
//! presentations.  A stray second scan therefore logs the holder back out;
//! that is the accepted cost of not needing a separate check-out action.

use heapless::Vec;
use log::info;

use crate::registry::{Identity, IdentityIndex, MAX_IDENTITIES, Registry};

/// Presence of one identity within the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    #[default]
    Outside,
    Inside,
}

/// Result of one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Known card, was outside, now inside.
    Login(IdentityIndex),
    /// Known card, was inside, now outside.
    Logout(IdentityIndex),
    /// Unknown card, or the read produced no identifier.
    Unauthorized,
}

impl ScanOutcome {
    /// Login or logout; lights the success indicator.
    pub fn is_authorized(self) -> bool {
        !matches!(self, Self::Unauthorized)
    }
}

/// One presence flag per registered identity, indexed by ordinal.
#[derive(Debug, Clone)]
pub struct PresenceTable {
    flags: Vec<Presence, MAX_IDENTITIES>,
}

impl PresenceTable {
    /// Everyone starts outside.
    pub fn new(len: usize) -> Self {
        let mut flags = Vec::new();
        flags.resize(len.min(MAX_IDENTITIES), Presence::Outside).ok();
        Self { flags }
    }

    /// Full reset: every identity back to `Outside`.
    pub fn reset(&mut self) {
        self.flags.iter_mut().for_each(|p| *p = Presence::Outside);
    }

    pub fn get(&self, index: IdentityIndex) -> Presence {
        self.flags.get(index.get()).copied().unwrap_or_default()
    }

    /// Flip one identity and return its new presence.
    fn toggle(&mut self, index: IdentityIndex) -> Presence {
        let Some(slot) = self.flags.get_mut(index.get()) else {
            return Presence::Outside;
        };
        *slot = match *slot {
            Presence::Outside => Presence::Inside,
            Presence::Inside => Presence::Outside,
        };
        *slot
    }

    pub fn inside_count(&self) -> usize {
        self.flags.iter().filter(|p| **p == Presence::Inside).count()
    }
}

/// Registry plus presence table: the whole access decision.
#[derive(Debug, Clone)]
pub struct PresenceEngine {
    registry: Registry,
    table: PresenceTable,
}

impl PresenceEngine {
    pub fn new(registry: Registry) -> Self {
        let table = PresenceTable::new(registry.len());
        Self { registry, table }
    }

    /// Decide the outcome of a scan and update the presence table.
    ///
    /// Side effects on the outside world (feed, display, indicator) are the
    /// caller's job.
    pub fn scan(&mut self, id: &str) -> ScanOutcome {
        let Some(identity) = self.registry.lookup(id) else {
            info!("presence: unknown card '{}'", id);
            return ScanOutcome::Unauthorized;
        };
        let index = identity.index;
        match self.table.toggle(index) {
            Presence::Inside => {
                info!("presence: {} checked in", identity.name);
                ScanOutcome::Login(index)
            }
            Presence::Outside => {
                info!("presence: {} checked out", identity.name);
                ScanOutcome::Logout(index)
            }
        }
    }

    /// Everyone back outside (new session).
    pub fn reset(&mut self) {
        self.table.reset();
    }

    pub fn identity(&self, index: IdentityIndex) -> Option<&Identity> {
        self.registry.get(index)
    }

    /// Presence of a card holder, `None` if the identifier is unknown.
    pub fn presence_of(&self, id: &str) -> Option<Presence> {
        self.registry.lookup(id).map(|i| self.table.get(i.index))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn table(&self) -> &PresenceTable {
        &self.table
    }
}
