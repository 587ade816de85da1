//! Shared DTO types used across multiple endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub(crate) use crate::domain::label::lenient_text;
use crate::domain::UserId;

/// Plain confirmation returned by delete endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Like [`lenient_text`] for optional fields: a present key is always
/// `Some`, whatever its JSON type.
pub(crate) fn lenient_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_text(deserializer).map(Some)
}

/// Reads a user reference sent as a number or a numeric string. Any
/// other value references nobody.
pub(crate) fn lenient_user_id<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(user_id_of(&Value::deserialize(deserializer)?))
}

/// Nullable user reference for updates: `null` clears it, an unreadable
/// value leaves it unchanged.
pub(crate) fn lenient_nullable_user_id<'de, D>(
    deserializer: D,
) -> Result<Option<Option<UserId>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(Some(None));
    }
    Ok(user_id_of(&value).map(Some))
}

/// Nullable timestamp for updates: `null` clears it, an RFC 3339 string
/// sets it, anything else leaves it unchanged.
pub(crate) fn lenient_nullable_time<'de, D>(
    deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(Some(None));
    }
    Ok(value
        .as_str()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
        .map(|ts| Some(ts.with_timezone(&Utc))))
}

fn user_id_of(value: &Value) -> Option<UserId> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .map(UserId::new)
}
