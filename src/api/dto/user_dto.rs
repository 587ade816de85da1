//! User DTOs. No response type carries the password secret.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::{lenient_opt_text, lenient_text};
use crate::domain::{NewUser, Role, User, UserId, UserPatch};

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Contact e-mail.
    pub email: String,
    /// Workshop role.
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Single-user envelope: `{"user": ...}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    /// The user.
    pub user: UserProfile,
}

/// User list envelope: `{"users": [...]}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    /// Users in id order.
    pub users: Vec<UserProfile>,
}

/// Request body for `POST /api/users`. Missing fields default to empty
/// and any role string is stored as sent.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Login name.
    #[serde(deserialize_with = "lenient_text")]
    pub username: String,
    /// Display name.
    #[serde(deserialize_with = "lenient_text")]
    pub full_name: String,
    /// Contact e-mail.
    #[serde(deserialize_with = "lenient_text")]
    pub email: String,
    /// Workshop role.
    pub role: Role,
    /// Password.
    #[serde(deserialize_with = "lenient_text")]
    pub password: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            full_name: req.full_name,
            email: req.email,
            role: req.role,
            password_secret: req.password,
        }
    }
}

/// Request body for `PUT /api/users/{id}`.
///
/// Absent fields are left unchanged. An `id` in the body is ignored; the
/// path id always wins.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New login name.
    #[serde(deserialize_with = "lenient_opt_text")]
    pub username: Option<String>,
    /// New display name.
    #[serde(deserialize_with = "lenient_opt_text")]
    pub full_name: Option<String>,
    /// New e-mail.
    #[serde(deserialize_with = "lenient_opt_text")]
    pub email: Option<String>,
    /// New role.
    pub role: Option<Role>,
    /// New password.
    #[serde(deserialize_with = "lenient_opt_text")]
    pub password: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            username: req.username,
            full_name: req.full_name,
            email: req.email,
            role: req.role,
            password_secret: req.password,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn profile_never_serializes_password() {
        let user = User {
            id: UserId::new(1),
            username: "admin".to_string(),
            full_name: "Administrador".to_string(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
            password_secret: "admin123".to_string(),
        };
        let json = serde_json::to_value(UserProfile::from(&user)).unwrap_or_default();
        assert_eq!(json["fullName"], "Administrador");
        assert_eq!(json["role"], "admin");
        let text = json.to_string();
        assert!(!text.contains("admin123"));
        assert!(!text.contains("password"));
    }

    #[test]
    fn update_request_ignores_body_id() {
        let Ok(req) =
            serde_json::from_str::<UpdateUserRequest>(r#"{"id": 99, "fullName": "New Name"}"#)
        else {
            panic!("body should parse");
        };
        let patch = UserPatch::from(req);
        assert_eq!(patch.full_name.as_deref(), Some("New Name"));
        assert!(patch.username.is_none());
    }

    #[test]
    fn create_request_accepts_any_role() {
        let Ok(req) = serde_json::from_str::<CreateUserRequest>(
            r#"{"username": "ana", "role": "supervisor", "email": 42}"#,
        ) else {
            panic!("body should parse");
        };
        let user = NewUser::from(req);
        assert_eq!(user.role, Role::Other("supervisor".to_string()));
        assert_eq!(user.email, "42");
    }

    #[test]
    fn create_request_defaults_missing_fields() {
        let Ok(req) = serde_json::from_str::<CreateUserRequest>(r#"{"username": "ana"}"#) else {
            panic!("body should parse");
        };
        let user = NewUser::from(req);
        assert_eq!(user.username, "ana");
        assert_eq!(user.role, Role::Technician);
        assert!(user.email.is_empty());
    }
}
