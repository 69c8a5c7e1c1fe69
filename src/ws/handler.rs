//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::serve_connection;
use crate::app_state::AppState;
use crate::auth::Authenticated;

/// `GET /ws` — Upgrade an authenticated request to a push connection.
///
/// The [`Authenticated`] extractor runs before the upgrade, so a missing
/// or refused token yields `401 {"error": "<reason>"}` and the hub never
/// sees the request.
pub async fn ws_handler(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| serve_connection(socket, hub, identity))
}
