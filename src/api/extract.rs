//! Request extractors whose failures answer with the [`ApiError`] envelope.
//!
//! Axum's stock `Json`, `Query` and `Path` reject with plain-text bodies.
//! These wrappers route every rejection through [`ApiError`] so clients
//! always get `{"error": {"code", "message"}}`.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::domain::{OrderId, UserId};
use crate::error::ApiError;

/// JSON request body.
///
/// The `Content-Type` header is not checked, and an empty body reads as
/// `{}` so that every field takes its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;
        let parsed = if bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_str("{}")
        } else {
            serde_json::from_slice(&bytes)
        };
        parsed
            .map(Self)
            .map_err(|err| ApiError::InvalidRequest(format!("malformed JSON body: {err}")))
    }
}

/// URL query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// The `{id}` path segment, kept as text.
///
/// A segment that is not a non-negative integer names no record, so it
/// resolves to the matching not-found error rather than a bad request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathId(pub String);

impl PathId {
    /// Parses the segment as an order id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::OrderNotFound`] for a non-numeric segment.
    pub fn order(&self) -> Result<OrderId, ApiError> {
        self.0
            .trim()
            .parse()
            .map(OrderId::new)
            .map_err(|_| ApiError::OrderNotFound(self.0.clone()))
    }

    /// Parses the segment as a user id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UserNotFound`] for a non-numeric segment.
    pub fn user(&self) -> Result<UserId, ApiError> {
        self.0
            .trim()
            .parse()
            .map(UserId::new)
            .map_err(|_| ApiError::UserNotFound(self.0.clone()))
    }
}

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;
        Ok(Self(raw))
    }
}
