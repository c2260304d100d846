//! WebSocket handler — bidirectional frame relay.
//!
//! DESIGN
//! ======
//! On upgrade, the connection registers an outbound channel with the room
//! and enters a `select!` loop:
//! - Incoming client frames → parse into a `ClientEvent` → fan-out layer
//! - Frames queued on the connection's channel → forward to the socket
//!
//! Everything a connection receives, including the frames addressed to
//! itself (snapshot, its own commits), goes through its channel. That keeps
//! per-connection order equal to room dispatch order.
//!
//! There is no error channel: undecodable frames are logged and dropped.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → allocate connection id, register channel
//! 2. Client sends frames → dispatch → fan-out to channels
//! 3. Close → discard live stroke, leave registry, roster update to the rest
//!
//! A connection that falls behind is evicted by fan-out. Its channel closes,
//! the loop drains what was queued and exits, and the socket is dropped.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::frame::Frame;
use crate::protocol::ClientEvent;
use crate::services;
use crate::services::session::ConnectionId;
use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let (client_tx, mut client_rx) = mpsc::channel::<Frame>(state.config.client_channel_capacity);
    let conn = state.room.lock().await.connect(client_tx);

    info!(%conn, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        process_inbound_text(&state, conn, text.as_str()).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            frame = client_rx.recv() => {
                // Sender dropped: the room evicted this connection.
                let Some(frame) = frame else { break };
                if send_frame(&mut socket, &frame).await.is_err() {
                    break;
                }
            }
        }
    }

    let notified = services::fanout::handle_disconnect(&state, conn).await;
    info!(%conn, notified, "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Parse one inbound text frame and hand it to the fan-out layer.
///
/// Kept separate from the socket loop so tests can drive dispatch without a
/// live websocket. Returns the number of frames delivered.
pub(crate) async fn process_inbound_text(state: &AppState, conn: ConnectionId, text: &str) -> usize {
    let (frame, event) = match ClientEvent::parse(text) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(%conn, error = %e, "ws: dropped inbound frame");
            return 0;
        }
    };

    if frame.prefix() == "stroke" {
        debug!(%conn, syscall = %frame.syscall, "ws: recv frame");
    } else {
        info!(%conn, id = %frame.id, syscall = %frame.syscall, "ws: recv frame");
    }

    services::fanout::handle_event(state, conn, event).await
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            // Skip the frame, keep the connection.
            warn!(error = %e, syscall = %frame.syscall, "ws: failed to serialize frame");
            return Ok(());
        }
    };
    debug!(id = %frame.id, syscall = %frame.syscall, "ws: send frame");
    socket.send(Message::Text(json.into())).await
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
