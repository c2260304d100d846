//! Dispatcher — the synchronization reaction table.
//!
//! DESIGN
//! ======
//! Every inbound event maps to exactly one handler. A handler mutates the
//! `Whiteboard` and returns the `Outbound` messages it wants delivered; it
//! never touches a socket or a channel. The fan-out layer resolves each
//! `Audience` against the session registry and does the sending.
//!
//! FAN-OUT
//! =======
//! Live stroke traffic goes to `Peers` (everyone but the origin): the origin
//! already painted its own stroke locally. Committed operations go to `All`,
//! origin included, so the server-assigned id is what every client keeps.
//! The join snapshot goes to the `Origin` only, before the roster update.

use tracing::{debug, info};

use crate::operation::{Point, ShapeDraft, StickyDraft, StrokeStyle};
use crate::protocol::{ClientEvent, ServerEvent};
use crate::services::chat::ChatMessage;
use crate::services::session::{ConnectionId, DEFAULT_NAME, SessionRegistry};
use crate::state::Whiteboard;

// =============================================================================
// OUTBOUND
// =============================================================================

/// Who receives an outbound message, relative to the event's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// The originating connection only, joined or not.
    Origin,
    /// Every joined connection, origin included.
    All,
    /// Every joined connection except the origin.
    Peers,
}

impl Audience {
    /// Concrete recipients, in join order (origin first for `Origin`).
    #[must_use]
    pub fn resolve(self, origin: ConnectionId, sessions: &SessionRegistry) -> Vec<ConnectionId> {
        match self {
            Self::Origin => vec![origin],
            Self::All => sessions.connections().collect(),
            Self::Peers => sessions.connections().filter(|c| *c != origin).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub audience: Audience,
    pub event: ServerEvent,
}

impl Outbound {
    fn origin(event: ServerEvent) -> Self {
        Self { audience: Audience::Origin, event }
    }

    fn all(event: ServerEvent) -> Self {
        Self { audience: Audience::All, event }
    }

    fn peers(event: ServerEvent) -> Self {
        Self { audience: Audience::Peers, event }
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Apply one client event from `origin` and return what to send to whom.
pub fn dispatch(board: &mut Whiteboard, origin: ConnectionId, event: ClientEvent) -> Vec<Outbound> {
    match event {
        ClientEvent::Join { name } => handle_join(board, origin, name.as_deref()),
        ClientEvent::StrokeBegin(style) => handle_stroke_begin(board, origin, style),
        ClientEvent::StrokePoint(point) => handle_stroke_point(board, origin, point),
        ClientEvent::StrokeEnd => handle_stroke_end(board, origin),
        ClientEvent::ShapeAdd(draft) => handle_shape_add(board, origin, draft),
        ClientEvent::StickyAdd(draft) => handle_sticky_add(board, origin, draft),
        ClientEvent::Undo => handle_undo(board, origin),
        ClientEvent::Redo => handle_redo(board, origin),
        ClientEvent::Clear => handle_clear(board, origin),
        ClientEvent::DrawingStatus { drawing } => handle_drawing_status(board, origin, drawing),
        ClientEvent::Chat { text } => handle_chat(board, origin, &text),
    }
}

/// Tear down everything `origin` owned. Any unfinished stroke is lost.
pub fn disconnect(board: &mut Whiteboard, origin: ConnectionId) -> Vec<Outbound> {
    if let Some(stroke) = board.strokes.discard(origin) {
        debug!(owner = %stroke.owner, points = stroke.points.len(), "stroke: discarded on disconnect");
    }
    if let Some(user) = board.sessions.leave(origin) {
        info!(%origin, name = %user.name, "session: left");
    }
    if board.sessions.is_empty() {
        info!(ops = board.log.len(), "session: room is empty");
    }
    vec![Outbound::all(ServerEvent::UsersUpdate { users: board.sessions.roster() })]
}

// =============================================================================
// SESSION
// =============================================================================

fn handle_join(board: &mut Whiteboard, origin: ConnectionId, name: Option<&str>) -> Vec<Outbound> {
    let joined = board.sessions.join(origin, name);
    info!(%origin, name = %joined.user.name, color = %joined.user.color, users = joined.roster.len(), "session: joined");

    vec![
        Outbound::origin(ServerEvent::InitialState {
            ops: board.log.snapshot(),
            me: joined.user,
            users: joined.roster.clone(),
        }),
        Outbound::all(ServerEvent::UsersUpdate { users: joined.roster }),
    ]
}

// =============================================================================
// LIVE STROKES
// =============================================================================

fn handle_stroke_begin(board: &mut Whiteboard, origin: ConnectionId, style: StrokeStyle) -> Vec<Outbound> {
    if let Some(stale) = board.strokes.begin(origin, style.clone()) {
        debug!(%origin, points = stale.points.len(), "stroke: begin replaced an open buffer");
    }
    vec![Outbound::peers(ServerEvent::StrokeBegin { from: origin, style })]
}

fn handle_stroke_point(board: &mut Whiteboard, origin: ConnectionId, point: Point) -> Vec<Outbound> {
    if !board.strokes.add_point(origin, point) {
        return Vec::new();
    }
    vec![Outbound::peers(ServerEvent::StrokePoint { from: origin, point })]
}

fn handle_stroke_end(board: &mut Whiteboard, origin: ConnectionId) -> Vec<Outbound> {
    let points = board.strokes.get(origin).map_or(0, |s| s.points.len());
    let mut out = vec![Outbound::peers(ServerEvent::StrokeEnd { from: origin })];

    let Some(op) = board.strokes.end(origin) else {
        debug!(%origin, points, "stroke: ended without commit");
        return out;
    };
    let op = board.log.commit(op).clone();
    info!(%origin, id = %op.id, points, "oplog: committed stroke");
    out.push(Outbound::all(ServerEvent::OpCommit(op)));
    out
}

// =============================================================================
// SINGLE-SHOT OPERATIONS
// =============================================================================

fn handle_shape_add(board: &mut Whiteboard, origin: ConnectionId, draft: ShapeDraft) -> Vec<Outbound> {
    let op = board.log.commit(draft.into_operation()).clone();
    info!(%origin, id = %op.id, kind = op.kind(), "oplog: committed shape");
    vec![Outbound::all(ServerEvent::OpCommit(op))]
}

fn handle_sticky_add(board: &mut Whiteboard, origin: ConnectionId, draft: StickyDraft) -> Vec<Outbound> {
    let op = board.log.commit(draft.into_operation()).clone();
    info!(%origin, id = %op.id, kind = op.kind(), "oplog: committed sticky");
    vec![Outbound::all(ServerEvent::OpCommit(op))]
}

// =============================================================================
// HISTORY
// =============================================================================

fn handle_undo(board: &mut Whiteboard, origin: ConnectionId) -> Vec<Outbound> {
    let Some(id) = board.log.undo().map(|op| op.id) else {
        debug!(%origin, "oplog: undo on empty history");
        return Vec::new();
    };
    info!(%origin, %id, remaining = board.log.len(), redo = board.log.redo_depth(), "oplog: undo");
    vec![Outbound::all(ServerEvent::OpRemove { id })]
}

fn handle_redo(board: &mut Whiteboard, origin: ConnectionId) -> Vec<Outbound> {
    let Some(op) = board.log.redo().cloned() else {
        debug!(%origin, "oplog: redo on empty branch");
        return Vec::new();
    };
    info!(%origin, id = %op.id, redo = board.log.redo_depth(), "oplog: redo");
    vec![Outbound::all(ServerEvent::OpCommit(op))]
}

fn handle_clear(board: &mut Whiteboard, origin: ConnectionId) -> Vec<Outbound> {
    if board.log.is_empty() {
        debug!(%origin, redo = board.log.redo_depth(), "oplog: clear on empty history");
    }
    let dropped = board.log.len();
    board.log.clear();
    info!(%origin, dropped, "oplog: cleared");
    vec![Outbound::all(ServerEvent::StateReplace { ops: board.log.snapshot() })]
}

// =============================================================================
// PRESENCE
// =============================================================================

fn handle_drawing_status(board: &Whiteboard, origin: ConnectionId, drawing: bool) -> Vec<Outbound> {
    let name = board
        .sessions
        .get(origin)
        .map_or(DEFAULT_NAME, |u| u.name.as_str())
        .to_string();
    vec![Outbound::all(ServerEvent::DrawingStatus { drawing, name })]
}

fn handle_chat(board: &Whiteboard, origin: ConnectionId, text: &str) -> Vec<Outbound> {
    let msg = ChatMessage::compose(board.sessions.get(origin), text);
    debug!(%origin, chars = msg.text.chars().count(), "chat: message");
    vec![Outbound::all(ServerEvent::Chat(msg))]
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;
