//! Protocol — typed events on top of the `Frame` envelope.
//!
//! DESIGN
//! ======
//! `ClientEvent` is the closed set of things a client can ask for, decoded
//! from an inbound frame by its `syscall`. `ServerEvent` is the closed set of
//! things the server pushes, encoded back into a frame. Handlers only ever
//! see the typed forms.
//!
//! Decoding is forgiving about values (numbers are coerced, missing fields
//! take defaults) but strict about shape: an unknown syscall or a payload
//! that cannot be decoded at all is a `ProtocolError`. The transport logs
//! those and drops the frame. Nothing is reported back to the client.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::frame::{Data, Frame};
use crate::operation::{Operation, OperationId, Point, ShapeDraft, StickyDraft, StrokeStyle};
use crate::services::chat::ChatMessage;
use crate::services::session::{ConnectionId, User};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid frame json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown syscall: {0}")]
    UnknownSyscall(String),
    #[error("malformed {syscall} payload: {source}")]
    Payload {
        syscall: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// CLIENT -> SERVER
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Join { name: Option<String> },
    StrokeBegin(StrokeStyle),
    StrokePoint(Point),
    StrokeEnd,
    ShapeAdd(ShapeDraft),
    StickyAdd(StickyDraft),
    Undo,
    Redo,
    Clear,
    DrawingStatus { drawing: bool },
    Chat { text: String },
}

impl ClientEvent {
    /// Parse a websocket text message into its frame and typed event.
    ///
    /// # Errors
    ///
    /// Returns `Json` for text that is not a frame, `UnknownSyscall` for an
    /// unrecognized channel, and `Payload` for an undecodable payload.
    pub fn parse(text: &str) -> Result<(Frame, Self), ProtocolError> {
        let frame: Frame = serde_json::from_str(text)?;
        let event = Self::from_frame(&frame)?;
        Ok((frame, event))
    }

    /// Decode an inbound frame by its syscall.
    ///
    /// # Errors
    ///
    /// See [`ClientEvent::parse`].
    pub fn from_frame(frame: &Frame) -> Result<Self, ProtocolError> {
        match frame.syscall.as_str() {
            "join" => Ok(Self::Join {
                name: frame
                    .data
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            }),
            "stroke:begin" => decode(frame, "stroke:begin").map(Self::StrokeBegin),
            "stroke:point" => decode(frame, "stroke:point").map(Self::StrokePoint),
            "stroke:end" => Ok(Self::StrokeEnd),
            "shape:add" => decode(frame, "shape:add").map(Self::ShapeAdd),
            "sticky:add" => decode(frame, "sticky:add").map(Self::StickyAdd),
            "ops:undo" => Ok(Self::Undo),
            "ops:redo" => Ok(Self::Redo),
            "canvas:clear" => Ok(Self::Clear),
            "drawing:status" => Ok(Self::DrawingStatus { drawing: truthy(frame.data.get("drawing")) }),
            "chat:msg" => Ok(Self::Chat { text: text_of(frame.data.get("text")) }),
            other => Err(ProtocolError::UnknownSyscall(other.to_string())),
        }
    }
}

fn decode<T: DeserializeOwned>(frame: &Frame, syscall: &'static str) -> Result<T, ProtocolError> {
    serde_json::from_value(frame.data_object()).map_err(|source| ProtocolError::Payload { syscall, source })
}

/// Browser truthiness: `false`, `0`, `NaN`, `""`, `null`, and absent are false.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Stringify a chat payload the way a browser's `String(x || "")` would.
fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v) if truthy(Some(v)) => v.to_string(),
        _ => String::new(),
    }
}

// =============================================================================
// SERVER -> CLIENT
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Snapshot for a freshly joined connection.
    InitialState { ops: Vec<Operation>, me: User, users: Vec<User> },
    UsersUpdate { users: Vec<User> },
    StrokeBegin { from: ConnectionId, style: StrokeStyle },
    StrokePoint { from: ConnectionId, point: Point },
    StrokeEnd { from: ConnectionId },
    /// A canonical operation entered the log (new commit or redo).
    OpCommit(Operation),
    OpRemove { id: OperationId },
    StateReplace { ops: Vec<Operation> },
    DrawingStatus { drawing: bool, name: String },
    Chat(ChatMessage),
}

impl ServerEvent {
    #[must_use]
    pub fn syscall(&self) -> &'static str {
        match self {
            Self::InitialState { .. } => "initialState",
            Self::UsersUpdate { .. } => "users:update",
            Self::StrokeBegin { .. } => "stroke:begin",
            Self::StrokePoint { .. } => "stroke:point",
            Self::StrokeEnd { .. } => "stroke:end",
            Self::OpCommit(_) => "op:commit",
            Self::OpRemove { .. } => "op:remove",
            Self::StateReplace { .. } => "state:replace",
            Self::DrawingStatus { .. } => "drawing:status",
            Self::Chat(_) => "chat:msg",
        }
    }

    /// Encode into an outbound frame.
    #[must_use]
    pub fn to_frame(&self) -> Frame {
        let frame = Frame::event(self.syscall(), Data::new());
        match self {
            Self::InitialState { ops, me, users } => frame
                .with_data("ops", to_json(ops))
                .with_data("me", to_json(me))
                .with_data("users", to_json(users)),
            Self::UsersUpdate { users } => frame.with_data("users", to_json(users)),
            Self::StrokeBegin { from, style } => relay(frame, *from).with_data("s", to_json(style)),
            Self::StrokePoint { from, point } => relay(frame, *from).with_data("p", to_json(point)),
            Self::StrokeEnd { from } => relay(frame, *from),
            Self::OpCommit(op) => flatten(frame, to_json(op)),
            Self::OpRemove { id } => frame.with_data("id", to_json(id)),
            Self::StateReplace { ops } => frame.with_data("ops", to_json(ops)),
            Self::DrawingStatus { drawing, name } => frame
                .with_data("drawing", *drawing)
                .with_data("name", name.as_str()),
            Self::Chat(msg) => flatten(frame, to_json(msg)),
        }
    }
}

fn to_json(value: &impl serde::Serialize) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}

/// Tag a live-stroke relay with its origin, in the envelope and the payload.
fn relay(frame: Frame, from: ConnectionId) -> Frame {
    frame
        .with_from(from.to_string())
        .with_data("from", to_json(&from))
}

/// Spread an object's fields directly into the frame payload.
fn flatten(mut frame: Frame, value: Value) -> Frame {
    if let Value::Object(fields) = value {
        frame.data.extend(fields);
    }
    frame
}

#[cfg(test)]
#[path = "protocol_test.rs"]
mod tests;
