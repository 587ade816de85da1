//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::{CredentialAuthority, PlaceholderAuthority};
use crate::config::ServerConfig;
use crate::cors::OriginPolicy;
use crate::domain::{EventBus, Store};
use crate::service::OrderService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// In-memory users and orders.
    pub store: Arc<Store>,
    /// Order service for all order mutations.
    pub orders: Arc<OrderService>,
    /// Event bus for realtime subscriptions.
    pub event_bus: EventBus,
    /// Credential issue and resolution.
    pub authority: Arc<dyn CredentialAuthority>,
    /// Origin policy shared by CORS and the realtime upgrade.
    pub origin_policy: Arc<OriginPolicy>,
    /// Loaded configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wires the store, event bus and service from `config`, with the
    /// placeholder authority resolving every credential to user 1.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(if config.seed_demo_data {
            Store::with_demo_data()
        } else {
            Store::new()
        });
        let event_bus = EventBus::new(config.event_bus_capacity);
        let orders = Arc::new(OrderService::new(Arc::clone(&store), event_bus.clone()));
        Self {
            store,
            orders,
            event_bus,
            authority: Arc::new(PlaceholderAuthority::default()),
            origin_policy: Arc::new(config.origin_policy()),
            config: Arc::new(config),
        }
    }

    /// Replaces the credential authority.
    #[must_use]
    pub fn with_authority(mut self, authority: Arc<dyn CredentialAuthority>) -> Self {
        self.authority = authority;
        self
    }
}
