//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::http::HeaderMap;
use axum::http::header::ORIGIN;
use axum::response::{IntoResponse, Response};

use super::connection::{ConnectionContext, run_connection};
use crate::app_state::AppState;
use crate::error::ApiError;

/// `GET /ws`: Upgrade HTTP connection to WebSocket.
///
/// The `Origin` header is checked against the same policy as CORS before
/// the upgrade is attempted. Requests without an `Origin` (non-browser
/// clients) are let through.
pub async fn ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    if let Some(origin) = headers.get(ORIGIN) {
        let origin = origin.to_str().unwrap_or_default();
        if !state.origin_policy.allows(origin) {
            tracing::warn!(origin, "rejected realtime upgrade from disallowed origin");
            return ApiError::BadOrigin(origin.to_string()).into_response();
        }
    }

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    let ctx = ConnectionContext {
        connection_id: uuid::Uuid::new_v4().to_string(),
        port: state.config.listen_addr.port(),
        scope: state.config.broadcast_scope,
    };
    let feed = state.event_bus.subscribe();
    ws.on_upgrade(move |socket| run_connection(socket, feed, ctx))
}
