//! Service-order DTOs for list, history, create, update and comments.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{
    lenient_nullable_time, lenient_nullable_user_id, lenient_opt_text, lenient_text,
    lenient_user_id,
};
use crate::domain::{
    Comment, HistoryFilter, NewOrder, OrderFilter, OrderPatch, OrderStatus, Priority,
    ServiceOrder, UserId,
};

/// Single-order envelope: `{"order": ...}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    /// The order.
    pub order: ServiceOrder,
}

/// Order list envelope: `{"orders": [...]}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderListResponse {
    /// Orders in id order.
    pub orders: Vec<ServiceOrder>,
}

/// Comment envelope: `{"comment": ...}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    /// The new comment.
    pub comment: Comment,
}

/// Query parameters for `GET /api/os`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListOrdersQuery {
    /// Status wire name, or `all`.
    pub status: Option<String>,
    /// Priority wire name, or `all`.
    pub priority: Option<String>,
    /// Case-insensitive substring of the client name.
    pub client_name: Option<String>,
    /// Case-insensitive substring of the equipment name.
    pub equipment_name: Option<String>,
}

impl From<ListOrdersQuery> for OrderFilter {
    fn from(q: ListOrdersQuery) -> Self {
        Self {
            status: q.status,
            priority: q.priority,
            client_name: q.client_name,
            equipment_name: q.equipment_name,
        }
    }
}

/// Query parameters for `GET /api/os/history`.
///
/// Dates accept RFC 3339 timestamps or plain `YYYY-MM-DD`. A plain
/// `endDate` covers the whole day.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct HistoryQuery {
    /// Earliest creation date, inclusive.
    pub start_date: Option<String>,
    /// Latest creation date, inclusive.
    pub end_date: Option<String>,
}

impl HistoryQuery {
    /// Parses the date bounds.
    ///
    /// Returns `None` if a bound is present but is not a date. Such a
    /// bound can never be satisfied, so the caller answers with an empty
    /// history.
    #[must_use]
    pub fn into_filter(self) -> Option<HistoryFilter> {
        Some(HistoryFilter {
            start: read_bound(self.start_date.as_deref(), false)?,
            end: read_bound(self.end_date.as_deref(), true)?,
        })
    }
}

/// `Some(None)` for a blank bound, `None` for one that is not a date.
fn read_bound(raw: Option<&str>, end_of_day: bool) -> Option<Option<DateTime<Utc>>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Some(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(Some(ts.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Some(naive.and_utc()));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let time = if end_of_day {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    time.map(|t| Some(t.and_utc()))
}

/// Request body for `POST /api/os`.
///
/// Missing text fields are empty; status defaults to `pending` and
/// priority to `medium`. Nothing is validated: any status or priority
/// string is stored as sent, and non-string text fields keep their JSON
/// text.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Customer name.
    #[serde(deserialize_with = "lenient_text")]
    pub client_name: String,
    /// Customer phone.
    #[serde(deserialize_with = "lenient_text")]
    pub client_phone: String,
    /// Equipment description.
    #[serde(deserialize_with = "lenient_text")]
    pub equipment_name: String,
    /// Equipment serial number.
    #[serde(deserialize_with = "lenient_text")]
    pub equipment_serial: String,
    /// Reported defect.
    #[serde(deserialize_with = "lenient_text")]
    pub defect: String,
    /// Initial status.
    pub status: OrderStatus,
    /// Initial priority.
    pub priority: Priority,
    /// Technician in charge.
    #[serde(deserialize_with = "lenient_user_id")]
    #[schema(value_type = Option<u64>)]
    pub assigned_to_id: Option<UserId>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(req: CreateOrderRequest) -> Self {
        Self {
            client_name: req.client_name,
            client_phone: req.client_phone,
            equipment_name: req.equipment_name,
            equipment_serial: req.equipment_serial,
            defect: req.defect,
            status: req.status,
            priority: req.priority,
            assigned_to_id: req.assigned_to_id,
        }
    }
}

/// Request body for `PUT /api/os/{id}`.
///
/// Absent fields are left unchanged. `id`, `createdAt`, `createdById`,
/// `updatedAt` and `comments` in the body are ignored. `assignedToId`
/// and `completedAt` accept `null` to clear them; values of the wrong
/// shape there are skipped.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    /// New customer name.
    #[serde(deserialize_with = "lenient_opt_text")]
    pub client_name: Option<String>,
    /// New customer phone.
    #[serde(deserialize_with = "lenient_opt_text")]
    pub client_phone: Option<String>,
    /// New equipment description.
    #[serde(deserialize_with = "lenient_opt_text")]
    pub equipment_name: Option<String>,
    /// New serial number.
    #[serde(deserialize_with = "lenient_opt_text")]
    pub equipment_serial: Option<String>,
    /// New defect description.
    #[serde(deserialize_with = "lenient_opt_text")]
    pub defect: Option<String>,
    /// New status.
    pub status: Option<OrderStatus>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New assignee, `null` to unassign.
    #[serde(deserialize_with = "lenient_nullable_user_id")]
    #[schema(value_type = Option<u64>)]
    pub assigned_to_id: Option<Option<UserId>>,
    /// Explicit completion time, `null` to clear.
    #[serde(deserialize_with = "lenient_nullable_time")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateOrderRequest> for OrderPatch {
    fn from(req: UpdateOrderRequest) -> Self {
        Self {
            client_name: req.client_name,
            client_phone: req.client_phone,
            equipment_name: req.equipment_name,
            equipment_serial: req.equipment_serial,
            defect: req.defect,
            status: req.status,
            priority: req.priority,
            assigned_to_id: req.assigned_to_id,
            completed_at: req.completed_at,
        }
    }
}

/// Request body for `POST /api/os/{id}/comments`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CommentRequest {
    /// Comment text.
    #[serde(deserialize_with = "lenient_text")]
    pub comment: String,
}
