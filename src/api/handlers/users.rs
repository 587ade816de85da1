//! User CRUD handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    CreateUserRequest, MessageResponse, UpdateUserRequest, UserListResponse, UserProfile,
    UserResponse,
};
use crate::api::extract::{ApiJson, PathId};
use crate::app_state::AppState;
use crate::auth::Actor;
use crate::error::{ApiError, ErrorResponse};

/// `GET /api/users`: List all users.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    summary = "List users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All users in id order", body = UserListResponse),
        (status = 401, description = "Missing credential", body = ErrorResponse),
    )
)]
pub async fn list_users(State(state): State<AppState>, _actor: Actor) -> Json<UserListResponse> {
    let users = state
        .store
        .list_users()
        .await
        .into_iter()
        .map(UserProfile::from)
        .collect();
    Json(UserListResponse { users })
}

/// `POST /api/users`: Create a user.
///
/// # Errors
///
/// Returns [`ApiError::UsernameTaken`] if the username is in use.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    summary = "Create a user",
    security(("bearer" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 401, description = "Missing credential", body = ErrorResponse),
        (status = 409, description = "Username taken", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    _actor: Actor,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.store.create_user(req.into()).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "user created");
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            user: UserProfile::from(user),
        }),
    ))
}

/// `GET /api/users/{id}`: Get one user.
///
/// # Errors
///
/// Returns [`ApiError::UserNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    summary = "Get a user",
    security(("bearer" = [])),
    params(("id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    _actor: Actor,
    id: PathId,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.store.get_user(id.user()?).await?;
    Ok(Json(UserResponse {
        user: UserProfile::from(user),
    }))
}

/// `PUT /api/users/{id}`: Merge fields into a user.
///
/// # Errors
///
/// Returns [`ApiError::UserNotFound`] for an unknown id and
/// [`ApiError::UsernameTaken`] when renaming onto another user.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    summary = "Update a user",
    description = "Absent fields are kept. The id in the path always wins over any id in the body.",
    security(("bearer" = [])),
    params(("id" = u64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Username taken", body = ErrorResponse),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    _actor: Actor,
    id: PathId,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.store.update_user(id.user()?, req.into()).await?;
    tracing::info!(user_id = %user.id, "user updated");
    Ok(Json(UserResponse {
        user: UserProfile::from(user),
    }))
}

/// `DELETE /api/users/{id}`: Remove a user.
///
/// # Errors
///
/// Returns [`ApiError::UserNotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    summary = "Delete a user",
    security(("bearer" = [])),
    params(("id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    _actor: Actor,
    id: PathId,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = state.store.delete_user(id.user()?).await?;
    tracing::info!(user_id = %user.id, "user deleted");
    Ok(Json(MessageResponse::new("user deleted")))
}

/// User management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
