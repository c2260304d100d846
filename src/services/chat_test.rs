use super::*;
use crate::services::session::ConnectionId;

#[test]
fn compose_uses_sender_identity() {
    let user = User { user_id: ConnectionId::new(1), name: "Ada".into(), color: "#00cec9".into() };
    let msg = ChatMessage::compose(Some(&user), "hello");
    assert_eq!(msg.name, "Ada");
    assert_eq!(msg.color, "#00cec9");
    assert_eq!(msg.text, "hello");
    assert!(msg.ts > 0);
}

#[test]
fn compose_without_sender_uses_placeholders() {
    let msg = ChatMessage::compose(None, "hi");
    assert_eq!(msg.name, UNKNOWN_SENDER);
    assert_eq!(msg.color, UNKNOWN_COLOR);
}

#[test]
fn long_text_is_clamped() {
    let text = "x".repeat(MAX_CHAT_CHARS + 25);
    let msg = ChatMessage::compose(None, &text);
    assert_eq!(msg.text.chars().count(), MAX_CHAT_CHARS);
}
