//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server exposes one websocket endpoint for the whiteboard protocol and
//! a health probe. Static client assets are served elsewhere, so CORS is
//! wide open.

pub mod ws;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    let room = state.room.lock().await;
    Json(serde_json::json!({
        "status": "ok",
        "connections": room.clients.len(),
        "users": room.board.sessions.len(),
        "ops": room.board.log.len(),
    }))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
