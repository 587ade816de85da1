//! Workshop users: administrators and technicians.

use super::UserId;
use super::label::open_label;

open_label!(
    /// Role a user plays in the workshop.
    Role (default Technician) {
        /// Full access, manages users.
        Admin => "admin",
        /// Works on assigned service orders.
        Technician => "technician",
    }
);

/// A user record as held by the [`super::Store`].
///
/// The password secret lives here and nowhere else; every outward-facing
/// representation is built from [`crate::api::dto::UserProfile`], which
/// has no such field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier (immutable).
    pub id: UserId,
    /// Login name, unique across the store.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Contact e-mail.
    pub email: String,
    /// Workshop role.
    pub role: Role,
    /// Password-equivalent secret checked on login.
    pub password_secret: String,
}

impl User {
    /// Returns `true` if `candidate` matches the stored secret.
    #[must_use]
    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password_secret == candidate
    }

    /// Merges the present fields of `patch` over this record. The id is
    /// never touched.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(password) = patch.password_secret {
            self.password_secret = password;
        }
    }
}

/// Fields for a new user. Missing fields default to empty values.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    /// Login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Contact e-mail.
    pub email: String,
    /// Workshop role.
    pub role: Role,
    /// Password-equivalent secret.
    pub password_secret: String,
}

/// Partial update of a user. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    /// New login name.
    pub username: Option<String>,
    /// New display name.
    pub full_name: Option<String>,
    /// New e-mail.
    pub email: Option<String>,
    /// New role.
    pub role: Option<Role>,
    /// New password secret.
    pub password_secret: Option<String>,
}
