//! Change descriptions produced by service-order mutations.
//!
//! Every successful mutation yields one [`OrderEvent`], which the service
//! layer publishes on the [`super::EventBus`]. Realtime connections turn
//! it into a named frame (`os:created`, `os:updated`, ...).

use serde::Serialize;

use super::{Comment, OrderId, ServiceOrder};

/// What changed in the order collection.
///
/// Serializes to the event payload only; the event name comes from
/// [`OrderEvent::name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OrderEvent {
    /// A new order was opened.
    Created {
        /// The order as stored.
        order: ServiceOrder,
    },

    /// An order was modified.
    Updated {
        /// The order after the merge.
        order: ServiceOrder,
    },

    /// An order was removed.
    Deleted {
        /// Identifier of the removed order.
        #[serde(rename = "orderId")]
        order_id: OrderId,
    },

    /// A comment was appended to an order.
    Commented {
        /// Parent order.
        #[serde(rename = "osId")]
        os_id: OrderId,
        /// The new comment.
        comment: Comment,
    },
}

impl OrderEvent {
    /// Name the event is delivered under.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "os:created",
            Self::Updated { .. } => "os:updated",
            Self::Deleted { .. } => "os:deleted",
            Self::Commented { .. } => "os:comment",
        }
    }

    /// The order this event concerns.
    #[must_use]
    pub fn order_id(&self) -> OrderId {
        match self {
            Self::Created { order } | Self::Updated { order } => order.id,
            Self::Deleted { order_id } => *order_id,
            Self::Commented { os_id, .. } => *os_id,
        }
    }

    /// JSON payload carried by the event.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
