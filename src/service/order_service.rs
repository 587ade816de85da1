//! Order service: applies order mutations and emits events.

use std::sync::Arc;

use crate::domain::{
    Comment, EventBus, HistoryFilter, NewOrder, OrderEvent, OrderFilter, OrderId, OrderPatch,
    ServiceOrder, Store, StoreError, UserId,
};

/// Orchestration layer for service-order operations.
///
/// Owns references to the [`Store`] for state and the [`EventBus`] for
/// fan-out. Every mutation follows the same shape: mutate the store,
/// describe the change as an [`OrderEvent`] and publish it while the
/// store's write lock is still held, then return the result. Events thus
/// reach subscribers in the order the changes were applied. A failed
/// mutation publishes nothing.
#[derive(Debug, Clone)]
pub struct OrderService {
    store: Arc<Store>,
    event_bus: EventBus,
}

impl OrderService {
    /// Creates a new `OrderService`.
    #[must_use]
    pub fn new(store: Arc<Store>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Lists orders passing `filter`.
    pub async fn list_orders(&self, filter: &OrderFilter) -> Vec<ServiceOrder> {
        self.store.list_orders(filter).await
    }

    /// Lists closed orders inside the history range.
    pub async fn list_history(&self, filter: &HistoryFilter) -> Vec<ServiceOrder> {
        self.store.list_history(filter).await
    }

    /// Fetches one order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OrderNotFound`] for an unknown id.
    pub async fn get_order(&self, id: OrderId) -> Result<ServiceOrder, StoreError> {
        self.store.get_order(id).await
    }

    /// Opens a new order on behalf of `actor` and emits `os:created`.
    pub async fn create_order(&self, fields: NewOrder, actor: UserId) -> ServiceOrder {
        let mut receivers = 0;
        let order = self
            .store
            .create_order(fields, actor, |order| {
                receivers = self.emit(OrderEvent::Created {
                    order: order.clone(),
                });
            })
            .await;
        tracing::info!(order_id = %order.id, %actor, receivers, "service order created");
        order
    }

    /// Merges `patch` into an order and emits `os:updated`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OrderNotFound`] for an unknown id.
    pub async fn update_order(
        &self,
        id: OrderId,
        patch: OrderPatch,
    ) -> Result<ServiceOrder, StoreError> {
        let mut receivers = 0;
        let order = self
            .store
            .update_order(id, patch, |order| {
                receivers = self.emit(OrderEvent::Updated {
                    order: order.clone(),
                });
            })
            .await?;
        tracing::info!(order_id = %id, status = order.status.as_str(), receivers, "service order updated");
        Ok(order)
    }

    /// Removes an order and emits `os:deleted`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OrderNotFound`] for an unknown id.
    pub async fn delete_order(&self, id: OrderId) -> Result<(), StoreError> {
        let mut receivers = 0;
        self.store
            .delete_order(id, |_| {
                receivers = self.emit(OrderEvent::Deleted { order_id: id });
            })
            .await?;
        tracing::info!(order_id = %id, receivers, "service order deleted");
        Ok(())
    }

    /// Appends a comment by `actor` and emits `os:comment`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OrderNotFound`] for an unknown id.
    pub async fn add_comment(
        &self,
        id: OrderId,
        actor: UserId,
        text: String,
    ) -> Result<Comment, StoreError> {
        let mut receivers = 0;
        let comment = self
            .store
            .add_comment(id, actor, text, |comment| {
                receivers = self.emit(OrderEvent::Commented {
                    os_id: id,
                    comment: comment.clone(),
                });
            })
            .await?;
        tracing::info!(order_id = %id, comment_id = %comment.id, receivers, "comment added");
        Ok(comment)
    }

    fn emit(&self, event: OrderEvent) -> usize {
        let name = event.name();
        let receivers = self.event_bus.publish(event);
        tracing::debug!(event = name, receivers, "event published");
        receivers
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{FeedItem, OrderStatus};

    fn service() -> OrderService {
        OrderService::new(Arc::new(Store::with_demo_data()), EventBus::new(64))
    }

    fn fields(client: &str) -> NewOrder {
        NewOrder {
            client_name: client.to_string(),
            ..NewOrder::default()
        }
    }

    #[tokio::test]
    async fn create_publishes_created_event() {
        let svc = service();
        let mut rx = svc.event_bus().subscribe();

        let order = svc.create_order(fields("X"), UserId::new(1)).await;

        let Some(FeedItem::Event(event)) = rx.next().await else {
            panic!("expected os:created");
        };
        assert_eq!(event.name(), "os:created");
        assert_eq!(event.order_id(), order.id);
        let OrderEvent::Created { order: published } = event else {
            panic!("wrong variant");
        };
        assert_eq!(published, order);
    }

    #[tokio::test]
    async fn update_publishes_merged_order() {
        let svc = service();
        let mut rx = svc.event_bus().subscribe();

        let patch = OrderPatch {
            status: Some(OrderStatus::InProgress),
            ..OrderPatch::default()
        };
        let Ok(order) = svc.update_order(OrderId::new(1), patch).await else {
            panic!("update failed");
        };

        let Some(FeedItem::Event(OrderEvent::Updated { order: published })) = rx.next().await
        else {
            panic!("expected os:updated");
        };
        assert_eq!(published.status, OrderStatus::InProgress);
        assert_eq!(published, order);
    }

    #[tokio::test]
    async fn delete_publishes_id() {
        let svc = service();
        let mut rx = svc.event_bus().subscribe();

        assert!(svc.delete_order(OrderId::new(1)).await.is_ok());

        let Some(FeedItem::Event(event)) = rx.next().await else {
            panic!("expected os:deleted");
        };
        assert_eq!(event.name(), "os:deleted");
        assert_eq!(event.order_id(), OrderId::new(1));
    }

    #[tokio::test]
    async fn comment_publishes_comment_event() {
        let svc = service();
        let mut rx = svc.event_bus().subscribe();

        let Ok(comment) = svc
            .add_comment(OrderId::new(1), UserId::new(1), "peça chegou".to_string())
            .await
        else {
            panic!("comment failed");
        };

        let Some(FeedItem::Event(OrderEvent::Commented { os_id, comment: published })) =
            rx.next().await
        else {
            panic!("expected os:comment");
        };
        assert_eq!(os_id, OrderId::new(1));
        assert_eq!(published, comment);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_publish_in_commit_order() {
        let svc = service();
        let mut rx = svc.event_bus().subscribe();

        let mut handles = Vec::new();
        for i in 0..16 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                let patch = OrderPatch {
                    defect: Some(format!("d{i}")),
                    ..OrderPatch::default()
                };
                svc.update_order(OrderId::new(1), patch).await.is_ok()
            }));
        }
        for handle in handles {
            assert!(matches!(handle.await, Ok(true)));
        }

        let mut last = None;
        for _ in 0..16 {
            let Some(FeedItem::Event(OrderEvent::Updated { order })) = rx.next().await else {
                panic!("expected os:updated");
            };
            if let Some(previous) = last {
                assert!(order.updated_at > previous);
            }
            last = Some(order.updated_at);
        }
        let Ok(stored) = svc.get_order(OrderId::new(1)).await else {
            panic!("order should exist");
        };
        assert_eq!(last, Some(stored.updated_at));
    }

    #[tokio::test]
    async fn failed_mutations_publish_nothing() {
        let svc = service();
        let mut rx = svc.event_bus().subscribe();
        let missing = OrderId::new(404);

        assert!(svc.update_order(missing, OrderPatch::default()).await.is_err());
        assert!(svc.delete_order(missing).await.is_err());
        assert!(
            svc.add_comment(missing, UserId::new(1), "x".to_string())
                .await
                .is_err()
        );

        assert_eq!(rx.try_next(), None);
    }

    #[tokio::test]
    async fn reads_do_not_publish() {
        let svc = service();
        let mut rx = svc.event_bus().subscribe();

        let _ = svc.list_orders(&OrderFilter::default()).await;
        let _ = svc.list_history(&HistoryFilter::default()).await;
        let _ = svc.get_order(OrderId::new(1)).await;

        assert_eq!(rx.try_next(), None);
    }
}
