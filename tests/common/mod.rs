//! Shared helpers for the integration tests.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use os_tracker::app_state::AppState;
use os_tracker::config::ServerConfig;
use os_tracker::server::build_app;

/// Any credential other than `""` and `"null"` acts as user 1.
pub const TOKEN: &str = "token-1-1700000000000";

/// Demo-seeded configuration on an ephemeral loopback port, with a
/// frontend directory that does not exist.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        frontend_dir: PathBuf::from("/nonexistent/os-tracker-frontend"),
        ..ServerConfig::default()
    }
}

/// Builds the full router exactly as the binary does.
pub fn build_test_app(config: ServerConfig) -> Router {
    build_app(AppState::new(config))
}

/// Sends one request and returns the status and decoded JSON body
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let Ok(request) = builder.body(body) else {
        panic!("request should build");
    };
    let Ok(response) = app.clone().oneshot(request).await;
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body should be readable");
    };
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Authenticated GET.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(TOKEN), None).await
}

/// Authenticated request with a JSON body.
pub async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, method, uri, Some(TOKEN), Some(body)).await
}
