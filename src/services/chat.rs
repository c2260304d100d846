//! Chat service — compose a broadcastable chat line from a raw client message.

use serde::Serialize;

use crate::frame::now_ms;
use crate::services::session::{User, clamp_chars};

/// Longest chat text kept, in characters.
pub const MAX_CHAT_CHARS: usize = 300;

/// Sender name when the connection never joined.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Sender color when the connection never joined.
pub const UNKNOWN_COLOR: &str = "#888";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub name: String,
    pub color: String,
    pub text: String,
    /// Server receipt time, ms since Unix epoch.
    pub ts: i64,
}

impl ChatMessage {
    /// Stamp `text` with the sender's identity and the server clock.
    #[must_use]
    pub fn compose(sender: Option<&User>, text: &str) -> Self {
        let (name, color) = match sender {
            Some(user) => (user.name.clone(), user.color.clone()),
            None => (UNKNOWN_SENDER.to_string(), UNKNOWN_COLOR.to_string()),
        };
        Self { name, color, text: clamp_chars(text, MAX_CHAT_CHARS), ts: now_ms() }
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
