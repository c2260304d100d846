//! Session registry — who is connected, under what name and color.
//!
//! DESIGN
//! ======
//! Users are keyed by `ConnectionId` in a `BTreeMap`. Connection ids are
//! handed out monotonically by the room, so iteration order is join order
//! and the roster reads the same for every participant.
//!
//! Joining twice from one connection overwrites the earlier entry (new name,
//! new color). Nothing here can fail: bad names are clamped, not rejected.

use std::collections::BTreeMap;
use std::fmt;

use rand::seq::IndexedRandom;
use serde::Serialize;

/// Longest display name kept, in characters.
pub const MAX_NAME_CHARS: usize = 40;

/// Name used for empty or missing display names.
pub const DEFAULT_NAME: &str = "Guest";

/// Presence colors handed out at join time. Repeats are allowed.
pub const PALETTE: [&str; 6] = ["#ff6b6b", "#6c5ce7", "#00cec9", "#fdcb6e", "#e84393", "#0984e3"];

// =============================================================================
// TYPES
// =============================================================================

/// Stable per-connection index assigned at websocket upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(u64);

impl ConnectionId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A joined participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: ConnectionId,
    pub name: String,
    pub color: String,
}

/// Result of a join: the created user plus the roster that now includes them.
#[derive(Debug, Clone)]
pub struct Joined {
    pub user: User,
    pub roster: Vec<User>,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    users: BTreeMap<ConnectionId, User>,
}

// =============================================================================
// REGISTRY
// =============================================================================

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-register) the user behind `conn`.
    pub fn join(&mut self, conn: ConnectionId, name: Option<&str>) -> Joined {
        let user = User { user_id: conn, name: clamp_name(name), color: pick_color() };
        self.users.insert(conn, user.clone());
        Joined { user, roster: self.roster() }
    }

    /// Remove the user behind `conn`, returning it if one was registered.
    pub fn leave(&mut self, conn: ConnectionId) -> Option<User> {
        self.users.remove(&conn)
    }

    #[must_use]
    pub fn get(&self, conn: ConnectionId) -> Option<&User> {
        self.users.get(&conn)
    }

    /// All joined users in join order.
    #[must_use]
    pub fn roster(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    /// Connections that have joined, in join order.
    pub fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.users.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Keep at most `max` characters of `raw`.
pub(crate) fn clamp_chars(raw: &str, max: usize) -> String {
    raw.chars().take(max).collect()
}

/// Display name after defaulting and length clamping.
#[must_use]
pub fn clamp_name(raw: Option<&str>) -> String {
    match raw {
        Some(name) if !name.is_empty() => clamp_chars(name, MAX_NAME_CHARS),
        _ => DEFAULT_NAME.to_string(),
    }
}

fn pick_color() -> String {
    PALETTE
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(PALETTE[0])
        .to_string()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
