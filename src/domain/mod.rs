//! Domain layer: identifiers, users, service orders, the in-memory
//! store and the event system.
//!
//! Nothing in here depends on HTTP or WebSocket types. Mutations return
//! plain records; the service layer derives [`OrderEvent`]s from them and
//! publishes through the [`EventBus`].

pub mod event_bus;
pub mod ids;
pub(crate) mod label;
pub mod order;
pub mod order_event;
pub mod store;
pub mod user;

pub use event_bus::{EventBus, EventFeed, FeedItem};
pub use ids::{CommentId, OrderId, UserId};
pub use order::{
    Comment, HistoryFilter, NewOrder, OrderFilter, OrderPatch, OrderStatus, Priority,
    ServiceOrder,
};
pub use order_event::OrderEvent;
pub use store::{Store, StoreError};
pub use user::{NewUser, Role, User, UserPatch};
