//! Service orders ("OS"), their comments, and list filters.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::label::open_label;
use super::{CommentId, OrderId, UserId};

open_label!(
    /// Lifecycle status of a service order.
    OrderStatus (default Pending) {
        /// Received, not yet started.
        Pending => "pending",
        /// A technician is working on it.
        InProgress => "in_progress",
        /// Work finished.
        Completed => "completed",
        /// Dropped before completion.
        Cancelled => "cancelled",
    }
);

impl OrderStatus {
    /// Completed and cancelled orders make up the history.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

open_label!(
    /// Urgency of a service order.
    Priority (default Medium) {
        /// Can wait.
        Low => "low",
        /// Normal queue.
        Medium => "medium",
        /// Jump the queue.
        High => "high",
    }
);

/// Append-only note attached to a service order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Sequence number within the parent order.
    pub id: CommentId,
    /// Parent order.
    pub os_id: OrderId,
    /// Author.
    pub user_id: UserId,
    /// Comment text.
    pub comment: String,
    /// When the comment was added.
    pub created_at: DateTime<Utc>,
}

/// A service order as held by the [`super::Store`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    /// Store-assigned identifier (immutable).
    pub id: OrderId,
    /// Customer name.
    pub client_name: String,
    /// Customer phone.
    pub client_phone: String,
    /// Equipment description.
    pub equipment_name: String,
    /// Equipment serial number.
    pub equipment_serial: String,
    /// Reported defect.
    pub defect: String,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Urgency.
    pub priority: Priority,
    /// Creation timestamp (immutable).
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation, comments included.
    pub updated_at: DateTime<Utc>,
    /// When the order entered `completed`.
    pub completed_at: Option<DateTime<Utc>>,
    /// Technician in charge.
    pub assigned_to_id: Option<UserId>,
    /// Actor that opened the order (immutable).
    pub created_by_id: UserId,
    /// Comments in insertion order.
    pub comments: Vec<Comment>,
    #[serde(skip)]
    next_comment_id: CommentId,
}

impl ServiceOrder {
    /// Builds a fresh order from `fields`, stamped with `now`.
    #[must_use]
    pub fn new(id: OrderId, fields: NewOrder, created_by_id: UserId, now: DateTime<Utc>) -> Self {
        let completed_at = (fields.status == OrderStatus::Completed).then_some(now);
        Self {
            id,
            client_name: fields.client_name,
            client_phone: fields.client_phone,
            equipment_name: fields.equipment_name,
            equipment_serial: fields.equipment_serial,
            defect: fields.defect,
            status: fields.status,
            priority: fields.priority,
            created_at: now,
            updated_at: now,
            completed_at,
            assigned_to_id: fields.assigned_to_id,
            created_by_id,
            comments: Vec::new(),
            next_comment_id: CommentId::new(1),
        }
    }

    /// Merges the present fields of `patch` over this order and refreshes
    /// `updated_at`. Identity, creation metadata and comments are kept.
    pub fn apply(&mut self, patch: OrderPatch) {
        if let Some(v) = patch.client_name {
            self.client_name = v;
        }
        if let Some(v) = patch.client_phone {
            self.client_phone = v;
        }
        if let Some(v) = patch.equipment_name {
            self.equipment_name = v;
        }
        if let Some(v) = patch.equipment_serial {
            self.equipment_serial = v;
        }
        if let Some(v) = patch.defect {
            self.defect = v;
        }
        if let Some(v) = patch.priority {
            self.priority = v;
        }
        if let Some(v) = patch.assigned_to_id {
            self.assigned_to_id = v;
        }

        let now = advance(self.updated_at);
        if let Some(status) = patch.status {
            match (self.status == OrderStatus::Completed, status == OrderStatus::Completed) {
                (false, true) => self.completed_at = Some(now),
                (true, false) => self.completed_at = None,
                _ => {}
            }
            self.status = status;
        }
        if let Some(v) = patch.completed_at {
            self.completed_at = v;
        }
        self.updated_at = now;
    }

    /// Appends a comment with the next sequence number and refreshes
    /// `updated_at`.
    pub fn push_comment(&mut self, user_id: UserId, text: String) -> Comment {
        let now = advance(self.updated_at);
        let comment = Comment {
            id: self.next_comment_id,
            os_id: self.id,
            user_id,
            comment: text,
            created_at: now,
        };
        self.next_comment_id = self.next_comment_id.next();
        self.comments.push(comment.clone());
        self.updated_at = now;
        comment
    }
}

/// Returns the current time, nudged forward if the clock has not moved
/// past `previous`. `updated_at` must strictly increase on every mutation.
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        return now;
    }
    previous
        .checked_add_signed(TimeDelta::microseconds(1))
        .unwrap_or(now)
}

/// Fields for a new service order. Missing text fields are empty,
/// status defaults to `pending` and priority to `medium`.
#[derive(Debug, Clone, Default)]
pub struct NewOrder {
    /// Customer name.
    pub client_name: String,
    /// Customer phone.
    pub client_phone: String,
    /// Equipment description.
    pub equipment_name: String,
    /// Equipment serial number.
    pub equipment_serial: String,
    /// Reported defect.
    pub defect: String,
    /// Initial status.
    pub status: OrderStatus,
    /// Initial priority.
    pub priority: Priority,
    /// Technician in charge.
    pub assigned_to_id: Option<UserId>,
}

/// Partial update of a service order. `None` leaves the field unchanged;
/// for the nullable fields `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    /// New customer name.
    pub client_name: Option<String>,
    /// New customer phone.
    pub client_phone: Option<String>,
    /// New equipment description.
    pub equipment_name: Option<String>,
    /// New serial number.
    pub equipment_serial: Option<String>,
    /// New defect description.
    pub defect: Option<String>,
    /// New status.
    pub status: Option<OrderStatus>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New assignee, or `Some(None)` to unassign.
    pub assigned_to_id: Option<Option<UserId>>,
    /// Explicit completion timestamp, overriding the automatic one.
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

/// Conjunctive filter for the order list.
///
/// `status`/`priority` compare against the wire name; the value `"all"`
/// disables that filter. Name filters are case-insensitive substring
/// matches. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Exact status wire name, or `"all"`.
    pub status: Option<String>,
    /// Exact priority wire name, or `"all"`.
    pub priority: Option<String>,
    /// Substring of the client name.
    pub client_name: Option<String>,
    /// Substring of the equipment name.
    pub equipment_name: Option<String>,
}

impl OrderFilter {
    /// Returns `true` if `order` passes every active filter.
    #[must_use]
    pub fn matches(&self, order: &ServiceOrder) -> bool {
        exact(self.status.as_deref(), order.status.as_str())
            && exact(self.priority.as_deref(), order.priority.as_str())
            && contains(self.client_name.as_deref(), &order.client_name)
            && contains(self.equipment_name.as_deref(), &order.equipment_name)
    }
}

fn exact(filter: Option<&str>, value: &str) -> bool {
    match filter {
        None | Some("" | "all") => true,
        Some(wanted) => wanted == value,
    }
}

fn contains(filter: Option<&str>, value: &str) -> bool {
    match filter {
        None | Some("") => true,
        Some(needle) => value.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// Filter for the history view: closed orders whose `created_at` falls
/// inside the inclusive range.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryFilter {
    /// Earliest creation time, inclusive.
    pub start: Option<DateTime<Utc>>,
    /// Latest creation time, inclusive.
    pub end: Option<DateTime<Utc>>,
}

impl HistoryFilter {
    /// Returns `true` if `order` is closed and inside the range.
    #[must_use]
    pub fn matches(&self, order: &ServiceOrder) -> bool {
        order.status.is_closed()
            && self.start.is_none_or(|start| order.created_at >= start)
            && self.end.is_none_or(|end| order.created_at <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: OrderStatus) -> ServiceOrder {
        ServiceOrder::new(
            OrderId::new(1),
            NewOrder {
                client_name: "Maria Silva".to_string(),
                equipment_name: "Notebook Dell".to_string(),
                status,
                priority: Priority::High,
                ..NewOrder::default()
            },
            UserId::new(1),
            Utc::now(),
        )
    }

    #[test]
    fn new_order_starts_without_comments() {
        let o = order(OrderStatus::Pending);
        assert!(o.comments.is_empty());
        assert_eq!(o.created_at, o.updated_at);
        assert!(o.completed_at.is_none());
    }

    #[test]
    fn apply_advances_updated_at() {
        let mut o = order(OrderStatus::Pending);
        o.apply(OrderPatch {
            defect: Some("Tela quebrada".to_string()),
            ..OrderPatch::default()
        });
        assert!(o.updated_at > o.created_at);
        assert_eq!(o.defect, "Tela quebrada");
        assert_eq!(o.client_name, "Maria Silva");
    }

    #[test]
    fn completing_stamps_and_reopening_clears() {
        let mut o = order(OrderStatus::InProgress);
        o.apply(OrderPatch {
            status: Some(OrderStatus::Completed),
            ..OrderPatch::default()
        });
        assert_eq!(o.completed_at, Some(o.updated_at));

        o.apply(OrderPatch {
            status: Some(OrderStatus::InProgress),
            ..OrderPatch::default()
        });
        assert!(o.completed_at.is_none());
    }

    #[test]
    fn unassign_with_explicit_null() {
        let mut o = order(OrderStatus::Pending);
        o.assigned_to_id = Some(UserId::new(2));
        o.apply(OrderPatch {
            assigned_to_id: Some(None),
            ..OrderPatch::default()
        });
        assert!(o.assigned_to_id.is_none());
    }

    #[test]
    fn comments_get_increasing_ids() {
        let mut o = order(OrderStatus::Pending);
        let first = o.push_comment(UserId::new(1), "primeiro".to_string());
        let second = o.push_comment(UserId::new(1), "segundo".to_string());
        assert!(second.id > first.id);
        assert_eq!(o.comments, vec![first, second.clone()]);
        assert_eq!(o.updated_at, second.created_at);
    }

    #[test]
    fn filter_all_matches_everything() {
        let filter = OrderFilter {
            status: Some("all".to_string()),
            priority: Some("all".to_string()),
            ..OrderFilter::default()
        };
        assert!(filter.matches(&order(OrderStatus::Pending)));
        assert!(filter.matches(&order(OrderStatus::Cancelled)));
    }

    #[test]
    fn filter_status_is_exact() {
        let filter = OrderFilter {
            status: Some("pending".to_string()),
            ..OrderFilter::default()
        };
        assert!(filter.matches(&order(OrderStatus::Pending)));
        assert!(!filter.matches(&order(OrderStatus::InProgress)));
    }

    #[test]
    fn name_filters_ignore_case() {
        let filter = OrderFilter {
            client_name: Some("maria".to_string()),
            equipment_name: Some("DELL".to_string()),
            ..OrderFilter::default()
        };
        assert!(filter.matches(&order(OrderStatus::Pending)));

        let miss = OrderFilter {
            client_name: Some("joão".to_string()),
            ..OrderFilter::default()
        };
        assert!(!miss.matches(&order(OrderStatus::Pending)));
    }

    #[test]
    fn history_excludes_open_orders() {
        let filter = HistoryFilter::default();
        assert!(!filter.matches(&order(OrderStatus::Pending)));
        assert!(!filter.matches(&order(OrderStatus::InProgress)));
        assert!(filter.matches(&order(OrderStatus::Completed)));
        assert!(filter.matches(&order(OrderStatus::Cancelled)));
    }

    #[test]
    fn history_range_is_inclusive() {
        let o = order(OrderStatus::Completed);
        let filter = HistoryFilter {
            start: Some(o.created_at),
            end: Some(o.created_at),
        };
        assert!(filter.matches(&o));

        let later = HistoryFilter {
            start: o.created_at.checked_add_signed(TimeDelta::seconds(1)),
            end: None,
        };
        assert!(!later.matches(&o));
    }
}
