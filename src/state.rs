//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the single `Room`: the whiteboard (session registry, live stroke
//! relay, operation log) plus the outbound channel of every open connection.
//!
//! The room sits behind one mutex. Each inbound event is dispatched and
//! fanned out while holding it, so events run to completion in server
//! receipt order and every participant sees the same sequence. A second
//! room would just be a second `Room`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::config::Config;
use crate::frame::Frame;
use crate::services::live_stroke::LiveStrokeRelay;
use crate::services::oplog::OperationLog;
use crate::services::session::{ConnectionId, SessionRegistry};

// =============================================================================
// WHITEBOARD
// =============================================================================

/// The synchronization core's state. Owned by the room, mutated only by
/// the dispatcher.
#[derive(Debug, Default)]
pub struct Whiteboard {
    pub sessions: SessionRegistry,
    pub strokes: LiveStrokeRelay,
    pub log: OperationLog,
}

impl Whiteboard {
    #[must_use]
    pub fn new() -> Self {
        Self { sessions: SessionRegistry::new(), strokes: LiveStrokeRelay::new(), log: OperationLog::new() }
    }
}

// =============================================================================
// ROOM
// =============================================================================

pub struct Room {
    pub board: Whiteboard,
    /// Open connections: `connection_id` -> sender for outgoing frames.
    pub clients: HashMap<ConnectionId, mpsc::Sender<Frame>>,
    next_connection: u64,
}

impl Room {
    #[must_use]
    pub fn new() -> Self {
        Self { board: Whiteboard::new(), clients: HashMap::new(), next_connection: 1 }
    }

    /// Register an outbound channel and assign it a fresh connection id.
    pub fn connect(&mut self, tx: mpsc::Sender<Frame>) -> ConnectionId {
        let conn = ConnectionId::new(self.next_connection);
        self.next_connection += 1;
        self.clients.insert(conn, tx);
        conn
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub room: Arc<Mutex<Room>>,
    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { room: Arc::new(Mutex::new(Room::new())), config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
