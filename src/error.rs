//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the HTTP and realtime
//! surfaces. Each variant maps to a specific HTTP status code and a
//! structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::StoreError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "service order not found: 7"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                   |
/// |-----------|-------------------|-------------------------------|
/// | 1000–1999 | Authentication    | 401 Unauthorized              |
/// | 2000–2999 | Not Found / State | 404 Not Found / 409 Conflict  |
/// | 3000–3999 | Server            | 500 Internal Server Error     |
/// | 4000–4999 | Request / Origin  | 400 Bad Request / 403 Forbidden |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, empty or placeholder bearer credential.
    #[error("unauthorized")]
    Unauthorized,

    /// Login with an unknown username or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No user has the given id (or the id is not numeric).
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// No service order has the given id (or the id is not numeric).
    #[error("service order not found: {0}")]
    OrderNotFound(String),

    /// No API route matches the path.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// Username already belongs to another user.
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// Origin rejected by the CORS policy.
    #[error("origin not allowed: {0}")]
    BadOrigin(String),

    /// Request could not be interpreted.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The single-page application could not be served.
    #[error("frontend unavailable: {0}")]
    FrontendUnavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Unauthorized => 1001,
            Self::InvalidCredentials => 1002,
            Self::UserNotFound(_) => 2001,
            Self::OrderNotFound(_) => 2002,
            Self::RouteNotFound(_) => 2003,
            Self::UsernameTaken(_) => 2004,
            Self::Internal(_) => 3000,
            Self::FrontendUnavailable(_) => 3001,
            Self::BadOrigin(_) => 4001,
            Self::InvalidRequest(_) => 4002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::UserNotFound(_) | Self::OrderNotFound(_) | Self::RouteNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::UsernameTaken(_) => StatusCode::CONFLICT,
            Self::BadOrigin(_) => StatusCode::FORBIDDEN,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::FrontendUnavailable(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound(id) => Self::UserNotFound(id.to_string()),
            StoreError::OrderNotFound(id) => Self::OrderNotFound(id.to_string()),
            StoreError::UsernameTaken(name) => Self::UsernameTaken(name),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        (status, axum::Json(body)).into_response()
    }
}
