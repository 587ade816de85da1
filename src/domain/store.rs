//! In-memory store for users and service orders.
//!
//! [`Store`] owns every mutable collection for the process lifetime. All
//! state sits behind a single [`tokio::sync::RwLock`], so each operation,
//! including id assignment, is atomic with respect to every other one.
//! Identifiers come from monotonic counters and are never reused after a
//! delete.
//!
//! The store has no knowledge of HTTP or realtime delivery; callers turn
//! its results into [`super::OrderEvent`]s.

use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;

use super::order::{Comment, HistoryFilter, NewOrder, OrderFilter, OrderPatch, ServiceOrder};
use super::user::{NewUser, Role, User, UserPatch};
use super::{OrderId, OrderStatus, Priority, UserId};

/// Failures reported by [`Store`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No user with the given id.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No service order with the given id.
    #[error("service order not found: {0}")]
    OrderNotFound(OrderId),

    /// Another user already has this username.
    #[error("username already taken: {0}")]
    UsernameTaken(String),
}

#[derive(Debug)]
struct StoreState {
    users: BTreeMap<UserId, User>,
    orders: BTreeMap<OrderId, ServiceOrder>,
    next_user_id: UserId,
    next_order_id: OrderId,
}

impl StoreState {
    fn empty() -> Self {
        Self {
            users: BTreeMap::new(),
            orders: BTreeMap::new(),
            next_user_id: UserId::new(1),
            next_order_id: OrderId::new(1),
        }
    }

    fn username_taken(&self, username: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn insert_user(&mut self, fields: NewUser) -> Result<User, StoreError> {
        if self.username_taken(&fields.username, None) {
            return Err(StoreError::UsernameTaken(fields.username));
        }
        let id = self.next_user_id;
        self.next_user_id = id.next();
        let user = User {
            id,
            username: fields.username,
            full_name: fields.full_name,
            email: fields.email,
            role: fields.role,
            password_secret: fields.password_secret,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    fn insert_order(&mut self, fields: NewOrder, actor: UserId) -> ServiceOrder {
        let id = self.next_order_id;
        self.next_order_id = id.next();
        let order = ServiceOrder::new(id, fields, actor, Utc::now());
        self.orders.insert(id, order.clone());
        order
    }
}

fn seed_demo(state: &mut StoreState) -> Result<(), StoreError> {
    let admin = state.insert_user(NewUser {
        username: "admin".to_string(),
        full_name: "Administrador".to_string(),
        email: "admin@example.com".to_string(),
        role: Role::Admin,
        password_secret: "admin123".to_string(),
    })?;
    let tech = state.insert_user(NewUser {
        username: "tecnico".to_string(),
        full_name: "Técnico João".to_string(),
        email: "tecnico@example.com".to_string(),
        role: Role::Technician,
        password_secret: "tecnico123".to_string(),
    })?;
    state.insert_order(
        NewOrder {
            client_name: "Maria Silva".to_string(),
            client_phone: "(11) 98765-4321".to_string(),
            equipment_name: "Notebook Dell".to_string(),
            equipment_serial: "DL123456".to_string(),
            defect: "Não liga".to_string(),
            status: OrderStatus::Pending,
            priority: Priority::High,
            assigned_to_id: Some(tech.id),
        },
        admin.id,
    );
    Ok(())
}

/// Authoritative in-memory collections of users and service orders.
///
/// Constructed explicitly and shared through `Arc`; there is no global
/// instance. Listing operations return records in id order, which is
/// also creation order.
#[derive(Debug)]
pub struct Store {
    state: RwLock<StoreState>,
}

impl Store {
    /// Creates an empty store. The first user and order both get id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::empty()),
        }
    }

    /// Creates a store preloaded with the demo accounts (`admin`,
    /// `tecnico`) and one pending order assigned to the technician.
    #[must_use]
    pub fn with_demo_data() -> Self {
        let mut state = StoreState::empty();
        if let Err(err) = seed_demo(&mut state) {
            tracing::warn!(%err, "demo data not seeded");
        }
        Self {
            state: RwLock::new(state),
        }
    }

    // ── Users ───────────────────────────────────────────────────────────

    /// Returns every user in id order.
    pub async fn list_users(&self) -> Vec<User> {
        self.state.read().await.users.values().cloned().collect()
    }

    /// Returns the user with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UserNotFound`] if no such user exists.
    pub async fn get_user(&self, id: UserId) -> Result<User, StoreError> {
        self.state
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::UserNotFound(id))
    }

    /// Looks a user up by login name.
    pub async fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.state
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Inserts a new user under the next free id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UsernameTaken`] if the username is in use.
    pub async fn create_user(&self, fields: NewUser) -> Result<User, StoreError> {
        self.state.write().await.insert_user(fields)
    }

    /// Merges `patch` over an existing user. The id never changes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UserNotFound`] for an unknown id and
    /// [`StoreError::UsernameTaken`] when renaming onto another user.
    pub async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Err(StoreError::UserNotFound(id));
        }
        if let Some(username) = patch.username.as_deref()
            && state.username_taken(username, Some(id))
        {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }
        let user = state.users.get_mut(&id).ok_or(StoreError::UserNotFound(id))?;
        user.apply(patch);
        Ok(user.clone())
    }

    /// Removes a user, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UserNotFound`] if no such user exists.
    pub async fn delete_user(&self, id: UserId) -> Result<User, StoreError> {
        self.state
            .write()
            .await
            .users
            .remove(&id)
            .ok_or(StoreError::UserNotFound(id))
    }

    // ── Service orders ──────────────────────────────────────────────────

    /// Returns every order passing `filter`, in id order.
    pub async fn list_orders(&self, filter: &OrderFilter) -> Vec<ServiceOrder> {
        self.state
            .read()
            .await
            .orders
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect()
    }

    /// Returns completed and cancelled orders created inside the range.
    pub async fn list_history(&self, filter: &HistoryFilter) -> Vec<ServiceOrder> {
        self.state
            .read()
            .await
            .orders
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect()
    }

    /// Returns the order with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OrderNotFound`] if no such order exists.
    pub async fn get_order(&self, id: OrderId) -> Result<ServiceOrder, StoreError> {
        self.state
            .read()
            .await
            .orders
            .get(&id)
            .cloned()
            .ok_or(StoreError::OrderNotFound(id))
    }

    /// Opens a new order on behalf of `actor`.
    ///
    /// `on_commit` runs before the write lock is released, as do the
    /// callbacks of the other order mutations. Whatever it publishes is
    /// therefore ordered exactly like the changes themselves.
    pub async fn create_order(
        &self,
        fields: NewOrder,
        actor: UserId,
        on_commit: impl FnOnce(&ServiceOrder),
    ) -> ServiceOrder {
        let mut state = self.state.write().await;
        let order = state.insert_order(fields, actor);
        on_commit(&order);
        order
    }

    /// Merges `patch` over an existing order and refreshes `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OrderNotFound`] if no such order exists.
    pub async fn update_order(
        &self,
        id: OrderId,
        patch: OrderPatch,
        on_commit: impl FnOnce(&ServiceOrder),
    ) -> Result<ServiceOrder, StoreError> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .get_mut(&id)
            .ok_or(StoreError::OrderNotFound(id))?;
        order.apply(patch);
        on_commit(order);
        Ok(order.clone())
    }

    /// Removes an order and its comments, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OrderNotFound`] if no such order exists.
    pub async fn delete_order(
        &self,
        id: OrderId,
        on_commit: impl FnOnce(&ServiceOrder),
    ) -> Result<ServiceOrder, StoreError> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .remove(&id)
            .ok_or(StoreError::OrderNotFound(id))?;
        on_commit(&order);
        Ok(order)
    }

    /// Appends a comment by `actor` to an order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OrderNotFound`] if no such order exists.
    pub async fn add_comment(
        &self,
        id: OrderId,
        actor: UserId,
        text: String,
        on_commit: impl FnOnce(&Comment),
    ) -> Result<Comment, StoreError> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .get_mut(&id)
            .ok_or(StoreError::OrderNotFound(id))?;
        let comment = order.push_comment(actor, text);
        on_commit(&comment);
        Ok(comment)
    }

    /// Returns `(users, orders)` currently held.
    pub async fn counts(&self) -> (usize, usize) {
        let state = self.state.read().await;
        (state.users.len(), state.orders.len())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
