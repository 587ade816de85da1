//! Credential handling: token issue, bearer resolution, and the
//! [`Actor`] extractor.
//!
//! Handlers never look at the `Authorization` header themselves. They
//! take an [`Actor`] argument, which asks the configured
//! [`CredentialAuthority`] to turn the bearer credential into a user id.
//! Swapping the authority (for example for JWT validation) needs no
//! handler change.

use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;

use crate::app_state::AppState;
use crate::domain::{User, UserId};
use crate::error::ApiError;

/// Issues credentials at login and resolves them on later requests.
pub trait CredentialAuthority: Send + Sync + fmt::Debug {
    /// Returns a credential for `user` after a successful login.
    fn issue(&self, user: &User) -> String;

    /// Resolves a bearer credential to the acting user, or `None` if the
    /// credential is not accepted.
    fn resolve(&self, credential: &str) -> Option<UserId>;
}

/// Stand-in authority with no real validation.
///
/// Any credential other than the empty string or the literal `null` is
/// accepted, and every accepted credential resolves to the same fixed
/// actor. Issued tokens look like `token-<user id>-<unix millis>`.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderAuthority {
    actor: UserId,
}

impl PlaceholderAuthority {
    /// Creates an authority that resolves every credential to `actor`.
    #[must_use]
    pub const fn new(actor: UserId) -> Self {
        Self { actor }
    }
}

impl Default for PlaceholderAuthority {
    fn default() -> Self {
        Self::new(UserId::new(1))
    }
}

impl CredentialAuthority for PlaceholderAuthority {
    fn issue(&self, user: &User) -> String {
        format!("token-{}-{}", user.id, Utc::now().timestamp_millis())
    }

    fn resolve(&self, credential: &str) -> Option<UserId> {
        match credential {
            "" | "null" => None,
            _ => Some(self.actor),
        }
    }
}

/// Extracts the credential from an `Authorization` header.
///
/// A leading `Bearer ` is stripped when present; any other value is
/// taken as the credential itself.
#[must_use]
pub fn bearer_credential(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    Some(value.strip_prefix("Bearer ").unwrap_or(value).trim())
}

/// The identity a request executes as.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication. Rejects with [`ApiError::Unauthorized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Resolved user id.
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credential = bearer_credential(&parts.headers).ok_or(ApiError::Unauthorized)?;
        let user_id = state
            .authority
            .resolve(credential)
            .ok_or(ApiError::Unauthorized)?;
        Ok(Self { user_id })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;
    use crate::domain::Role;

    fn headers(value: &'static str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_static(value));
        map
    }

    #[test]
    fn placeholder_rejects_empty_and_null() {
        let auth = PlaceholderAuthority::default();
        assert_eq!(auth.resolve(""), None);
        assert_eq!(auth.resolve("null"), None);
    }

    #[test]
    fn placeholder_accepts_anything_else_as_fixed_actor() {
        let auth = PlaceholderAuthority::new(UserId::new(1));
        for credential in ["token-2-123", "x", "undefined", "NULL"] {
            assert_eq!(auth.resolve(credential), Some(UserId::new(1)));
        }
    }

    #[test]
    fn issued_token_names_the_user() {
        let auth = PlaceholderAuthority::default();
        let user = User {
            id: UserId::new(2),
            username: "tecnico".to_string(),
            full_name: String::new(),
            email: String::new(),
            role: Role::Technician,
            password_secret: String::new(),
        };
        let token = auth.issue(&user);
        assert!(token.starts_with("token-2-"));
        assert!(auth.resolve(&token).is_some());
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        assert_eq!(bearer_credential(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_credential(&headers("Bearer null")), Some("null"));
        assert_eq!(bearer_credential(&headers("Bearer ")), Some(""));
        assert_eq!(bearer_credential(&headers("abc")), Some("abc"));
    }

    #[test]
    fn missing_header_has_no_credential() {
        assert_eq!(bearer_credential(&HeaderMap::new()), None);
    }
}
