//! Login DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::lenient_text;
use super::user_dto::UserProfile;

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    /// Login name.
    #[serde(deserialize_with = "lenient_text")]
    pub username: String,
    /// Password.
    #[serde(deserialize_with = "lenient_text")]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Always `true`.
    pub success: bool,
    /// Bearer credential for later requests.
    pub token: String,
    /// The logged-in user.
    pub user: UserProfile,
}

/// Response for `GET /api/auth/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    /// The acting user.
    pub user: UserProfile,
}
