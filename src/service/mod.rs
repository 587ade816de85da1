//! Service layer: business logic orchestration.
//!
//! [`OrderService`] coordinates service-order mutations on the
//! [`crate::domain::Store`] and emits events through the
//! [`crate::domain::EventBus`].

pub mod order_service;

pub use order_service::OrderService;
