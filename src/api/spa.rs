//! Single-page application fallback.
//!
//! Any request no route claimed lands here. Paths under the reserved
//! namespaces get a JSON 404; everything else is served from the frontend
//! directory, with `index.html` standing in for unknown paths so the
//! client-side router can take over.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::app_state::AppState;
use crate::error::ApiError;

/// Path prefixes that never fall back to the frontend.
const RESERVED_PREFIXES: [&str; 3] = ["/api", "/ws", "/health"];

/// Returns `true` if `path` is `prefix` itself or lies below it.
fn is_reserved(path: &str) -> bool {
    RESERVED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Fallback handler serving static assets and the SPA entry document.
///
/// # Errors
///
/// Returns [`ApiError::RouteNotFound`] for reserved paths and
/// [`ApiError::FrontendUnavailable`] when `index.html` is missing.
pub async fn spa_fallback(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ApiError> {
    let path = request.uri().path().to_string();
    if is_reserved(&path) {
        return Err(ApiError::RouteNotFound(path));
    }

    let dir = &state.config.frontend_dir;
    let index = dir.join("index.html");
    let service = ServeDir::new(dir).fallback(ServeFile::new(&index));
    let Ok(response) = service.oneshot(request).await;

    if response.status() == StatusCode::NOT_FOUND {
        tracing::warn!(path = %path, index = %index.display(), "frontend entry document missing");
        return Err(ApiError::FrontendUnavailable(index.display().to_string()));
    }
    Ok(response.into_response())
}
