//! Live stroke relay — per-connection buffers for in-progress freehand strokes.
//!
//! DESIGN
//! ======
//! One buffer per connection, keyed by `ConnectionId`. Only the owning
//! connection's events ever touch its buffer. Buffers are transient: they
//! become a committed `stroke` operation on end (if they hold any point) or
//! vanish on disconnect.
//!
//! Out-of-order events are absorbed. A second begin replaces the open
//! buffer, points without a buffer are ignored, and an end without a
//! buffer commits nothing.
//!
//! A connection that drops mid-stroke loses that stroke. Nothing is
//! committed on its behalf.

use std::collections::HashMap;

use crate::operation::{Operation, Point, StrokeStyle};
use crate::services::session::ConnectionId;

/// An uncommitted stroke being drawn by one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveStroke {
    pub owner: ConnectionId,
    pub style: StrokeStyle,
    pub points: Vec<Point>,
}

#[derive(Debug, Default)]
pub struct LiveStrokeRelay {
    buffers: HashMap<ConnectionId, LiveStroke>,
}

impl LiveStrokeRelay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty buffer for `conn`. Returns the buffer it displaced, if any.
    pub fn begin(&mut self, conn: ConnectionId, style: StrokeStyle) -> Option<LiveStroke> {
        self.buffers
            .insert(conn, LiveStroke { owner: conn, style, points: Vec::new() })
    }

    /// Append a point to `conn`'s open buffer. Returns `false` when there is none.
    pub fn add_point(&mut self, conn: ConnectionId, point: Point) -> bool {
        let Some(stroke) = self.buffers.get_mut(&conn) else {
            return false;
        };
        stroke.points.push(point);
        true
    }

    /// Close `conn`'s buffer, converting it into a stroke operation when it
    /// holds at least one point. The buffer is removed either way.
    pub fn end(&mut self, conn: ConnectionId) -> Option<Operation> {
        let stroke = self.buffers.remove(&conn)?;
        if stroke.points.is_empty() {
            return None;
        }
        Some(Operation::stroke(stroke.style, stroke.points))
    }

    /// Drop `conn`'s buffer without committing.
    pub fn discard(&mut self, conn: ConnectionId) -> Option<LiveStroke> {
        self.buffers.remove(&conn)
    }

    #[must_use]
    pub fn get(&self, conn: ConnectionId) -> Option<&LiveStroke> {
        self.buffers.get(&conn)
    }
}

#[cfg(test)]
#[path = "live_stroke_test.rs"]
mod tests;
