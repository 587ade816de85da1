//! Realtime layer: connection handling, frame codec, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes `os:*` events to connected
//! clients and accepts `os:subscribe`, `os:unsubscribe` and `ping`.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;

/// Realtime routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ws", get(handler::ws_handler))
}
