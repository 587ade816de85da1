//! Per-connection subscription manager.
//!
//! Tracks which order topics a realtime client has joined and decides
//! whether an [`OrderEvent`] is delivered to it.

use std::collections::HashSet;

use crate::config::BroadcastScope;
use crate::domain::{OrderEvent, OrderId};

/// Manages the set of order subscriptions for a single connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    order_ids: HashSet<OrderId>,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the topic of `id`. Joining twice is a no-op.
    pub fn subscribe(&mut self, id: OrderId) {
        self.order_ids.insert(id);
    }

    /// Leaves the topic of `id`. Leaving a topic never joined is a no-op.
    pub fn unsubscribe(&mut self, id: OrderId) {
        self.order_ids.remove(&id);
    }

    /// Returns `true` if the connection joined the topic of `id`.
    #[must_use]
    pub fn is_subscribed(&self, id: OrderId) -> bool {
        self.order_ids.contains(&id)
    }

    /// Returns the number of joined topics.
    #[must_use]
    pub fn count(&self) -> usize {
        self.order_ids.len()
    }

    /// Decides whether `event` goes out on this connection.
    ///
    /// In [`BroadcastScope::Global`] every event is delivered. In
    /// [`BroadcastScope::Topic`] creations are still delivered to all,
    /// since nobody can have subscribed to an order before it exists.
    #[must_use]
    pub fn should_deliver(&self, event: &OrderEvent, scope: BroadcastScope) -> bool {
        match (scope, event) {
            (BroadcastScope::Global, _) | (BroadcastScope::Topic, OrderEvent::Created { .. }) => {
                true
            }
            (BroadcastScope::Topic, _) => self.is_subscribed(event.order_id()),
        }
    }
}
