use super::*;

fn conn(n: u64) -> ConnectionId {
    ConnectionId::new(n)
}

// =============================================================================
// clamp_name
// =============================================================================

#[test]
fn empty_or_missing_name_becomes_guest() {
    assert_eq!(clamp_name(None), "Guest");
    assert_eq!(clamp_name(Some("")), "Guest");
}

#[test]
fn name_at_limit_is_kept() {
    let name = "a".repeat(MAX_NAME_CHARS);
    assert_eq!(clamp_name(Some(&name)), name);
}

#[test]
fn long_name_is_truncated_to_40_chars() {
    let name = "b".repeat(41);
    let clamped = clamp_name(Some(&name));
    assert_eq!(clamped.chars().count(), 40);
    assert_eq!(clamped, "b".repeat(40));
}

#[test]
fn truncation_counts_chars_not_bytes() {
    let name = "é".repeat(50);
    let clamped = clamp_name(Some(&name));
    assert_eq!(clamped.chars().count(), 40);
    assert_eq!(clamped.len(), 80);
}

// =============================================================================
// join / leave
// =============================================================================

#[test]
fn join_assigns_palette_color_and_returns_roster() {
    let mut registry = SessionRegistry::new();
    let joined = registry.join(conn(1), Some("Ada"));

    assert_eq!(joined.user.user_id, conn(1));
    assert_eq!(joined.user.name, "Ada");
    assert!(PALETTE.contains(&joined.user.color.as_str()));
    assert_eq!(joined.roster, vec![joined.user.clone()]);
}

#[test]
fn roster_is_in_join_order() {
    let mut registry = SessionRegistry::new();
    registry.join(conn(3), Some("c"));
    registry.join(conn(1), Some("a"));
    let joined = registry.join(conn(2), Some("b"));

    let ids: Vec<ConnectionId> = joined.roster.iter().map(|u| u.user_id).collect();
    assert_eq!(ids, vec![conn(1), conn(2), conn(3)]);
    assert_eq!(registry.connections().collect::<Vec<_>>(), ids);
}

#[test]
fn rejoin_overwrites_previous_entry() {
    let mut registry = SessionRegistry::new();
    registry.join(conn(1), Some("first"));
    let joined = registry.join(conn(1), Some("second"));

    assert_eq!(registry.len(), 1);
    assert_eq!(joined.roster.len(), 1);
    assert_eq!(registry.get(conn(1)).map(|u| u.name.as_str()), Some("second"));
}

#[test]
fn leave_removes_user() {
    let mut registry = SessionRegistry::new();
    registry.join(conn(1), Some("a"));
    registry.join(conn(2), Some("b"));

    let left = registry.leave(conn(1)).expect("user should be registered");
    assert_eq!(left.name, "a");
    assert!(registry.get(conn(1)).is_none());
    assert_eq!(registry.roster().len(), 1);
}

#[test]
fn registry_is_empty_after_last_leave() {
    let mut registry = SessionRegistry::new();
    assert!(registry.is_empty());
    registry.join(conn(1), Some("a"));
    assert!(!registry.is_empty());
    registry.leave(conn(1));
    assert!(registry.is_empty());
}

#[test]
fn leave_unknown_connection_is_noop() {
    let mut registry = SessionRegistry::new();
    registry.join(conn(1), None);
    assert!(registry.leave(conn(9)).is_none());
    assert_eq!(registry.len(), 1);
}

#[test]
fn color_is_stable_for_the_session() {
    let mut registry = SessionRegistry::new();
    let joined = registry.join(conn(1), Some("Ada"));
    registry.join(conn(2), Some("Bob"));
    registry.leave(conn(2));
    assert_eq!(registry.get(conn(1)).map(|u| u.color.clone()), Some(joined.user.color));
}

#[test]
fn user_wire_shape() {
    let user = User { user_id: conn(4), name: "Ada".into(), color: "#0984e3".into() };
    let v = serde_json::to_value(&user).unwrap();
    assert_eq!(v, serde_json::json!({"userId": 4, "name": "Ada", "color": "#0984e3"}));
}
