use super::*;
use crate::protocol::ClientEvent;
use crate::services::fanout;
use crate::state::test_helpers;

#[tokio::test]
async fn healthz_reports_room_counts() {
    let state = test_helpers::test_app_state();
    let (a, _rx_a) = test_helpers::connect(&state).await;
    let (_b, _rx_b) = test_helpers::connect(&state).await;
    fanout::handle_event(&state, a, ClientEvent::Join { name: Some("Ada".into()) }).await;
    fanout::handle_event(&state, a, ClientEvent::Chat { text: "not an op".into() }).await;

    let Json(body) = healthz(State(state)).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["connections"], 2);
    assert_eq!(body["users"], 1);
    assert_eq!(body["ops"], 0);
}
