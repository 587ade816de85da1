//! REST API layer: route handlers, DTOs, OpenAPI document, router
//! composition and the SPA fallback.
//!
//! Resource endpoints are mounted under `/api`; `/health` sits at the root.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod openapi;
pub mod spa;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes())
}
