//! Fan-out — run the dispatcher against the room and deliver its output.
//!
//! DESIGN
//! ======
//! Dispatch and delivery happen under the same room lock, so the order in
//! which events mutate the whiteboard is exactly the order in which every
//! connection receives the resulting frames.
//!
//! Channels are bounded. A connection whose channel is full has missed a
//! frame and can no longer mirror the log, so it is evicted: its sender is
//! dropped (which ends its socket loop), it leaves the registry, and the
//! remaining participants get a roster update. The client resyncs by
//! reconnecting and joining, which hands it a fresh `initialState`.

use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::protocol::ClientEvent;
use crate::services::dispatch::{self, Outbound};
use crate::services::session::ConnectionId;
use crate::state::{AppState, Room};

/// Dispatch one client event and deliver the result. Returns frames sent.
///
/// Events from a connection that was already evicted are ignored.
pub async fn handle_event(state: &AppState, origin: ConnectionId, event: ClientEvent) -> usize {
    let mut room = state.room.lock().await;
    if !room.clients.contains_key(&origin) {
        debug!(%origin, "fanout: ignored event from evicted connection");
        return 0;
    }
    let outbound = dispatch::dispatch(&mut room.board, origin, event);
    deliver(&mut room, origin, &outbound)
}

/// Tear down a closed connection and tell the remaining participants.
///
/// A connection evicted for lagging was already torn down; nothing is sent twice.
pub async fn handle_disconnect(state: &AppState, origin: ConnectionId) -> usize {
    let mut room = state.room.lock().await;
    if room.clients.remove(&origin).is_none() {
        return 0;
    }
    let outbound = dispatch::disconnect(&mut room.board, origin);
    deliver(&mut room, origin, &outbound)
}

/// Send each outbound message to its resolved audience, evicting any
/// connection that cannot keep up. Returns frames sent.
pub fn deliver(room: &mut Room, origin: ConnectionId, outbound: &[Outbound]) -> usize {
    let (mut sent, mut lagging) = send_all(room, origin, outbound);

    // Evictions produce roster updates, which can overflow someone else.
    while let Some(conn) = lagging.pop() {
        if room.clients.remove(&conn).is_none() {
            continue;
        }
        warn!(%conn, "fanout: evicted lagging connection");
        let roster = dispatch::disconnect(&mut room.board, conn);
        let (more, more_lagging) = send_all(room, conn, &roster);
        sent += more;
        lagging.extend(more_lagging);
    }
    sent
}

fn send_all(room: &Room, origin: ConnectionId, outbound: &[Outbound]) -> (usize, Vec<ConnectionId>) {
    let mut sent = 0;
    let mut lagging = Vec::new();
    for out in outbound {
        let frame = out.event.to_frame();
        for conn in out.audience.resolve(origin, &room.board.sessions) {
            if lagging.contains(&conn) {
                continue;
            }
            // Joined but already gone; its disconnect is queued behind this lock.
            let Some(tx) = room.clients.get(&conn) else {
                continue;
            };
            match tx.try_send(frame.clone()) {
                Ok(()) => sent += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(%conn, syscall = %frame.syscall, "fanout: channel full");
                    lagging.push(conn);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(%conn, syscall = %frame.syscall, "fanout: channel closed");
                }
            }
        }
    }
    (sent, lagging)
}

#[cfg(test)]
#[path = "fanout_test.rs"]
mod tests;
