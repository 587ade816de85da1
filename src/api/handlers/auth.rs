//! Login and current-user handlers.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{LoginRequest, LoginResponse, MeResponse, UserProfile};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::auth::Actor;
use crate::error::{ApiError, ErrorResponse};

/// `POST /api/auth/login`: Exchange username and password for a token.
///
/// # Errors
///
/// Returns [`ApiError::InvalidCredentials`] for an unknown username or a
/// wrong password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    summary = "Log in",
    description = "Checks the username and password and returns a bearer token together with the user's public profile.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .store
        .find_user_by_username(&req.username)
        .await
        .filter(|user| user.verify_password(&req.password))
        .ok_or_else(|| {
            tracing::debug!(username = %req.username, "login rejected");
            ApiError::InvalidCredentials
        })?;

    let token = state.authority.issue(&user);
    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        success: true,
        token,
        user: UserProfile::from(user),
    }))
}

/// `GET /api/auth/me`: Profile of the acting user.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] without a usable credential and
/// [`ApiError::UserNotFound`] if the actor no longer exists.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    summary = "Current user",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Acting user", body = MeResponse),
        (status = 401, description = "Missing credential", body = ErrorResponse),
        (status = 404, description = "Actor no longer exists", body = ErrorResponse),
    )
)]
pub async fn me(State(state): State<AppState>, actor: Actor) -> Result<Json<MeResponse>, ApiError> {
    let user = state.store.get_user(actor.user_id).await?;
    Ok(Json(MeResponse {
        user: UserProfile::from(user),
    }))
}

/// Authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}
