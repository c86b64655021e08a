//! In-memory store for users, products, orders and sessions.
//!
//! A single reader/writer lock guards the whole dataset. Reads take a shared
//! hold, every mutation takes an exclusive hold, and no public operation
//! releases the lock part way through. That is what makes order placement
//! atomic: the stock check, the decrements and the order/item inserts are one
//! critical section.
//!
//! Values handed back to callers are clones; nothing outside this module can
//! reach the internal maps.

pub mod models;
pub mod seeders;

pub use models::*;

use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Default capacity of the order notification queue
pub const ORDER_QUEUE_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("product {0} not found")]
    ProductNotFound(Id),

    #[error("user {0} not found")]
    UserNotFound(Id),

    #[error("no user with that email")]
    EmailNotFound,

    #[error("session not found")]
    SessionNotFound,

    #[error("email {0} already exists")]
    DuplicateEmail(String),

    #[error("items list is empty")]
    EmptyItemList,

    #[error("item {line}: quantity for product {product_id} must be > 0, got {quantity}")]
    InvalidQuantity {
        line: usize,
        product_id: Id,
        quantity: i64,
    },

    #[error("item {line}: not enough stock for product {product_id} (requested {requested}, available {available})")]
    InsufficientStock {
        line: usize,
        product_id: Id,
        requested: i64,
        available: i64,
    },
}

impl StoreError {
    /// Whether this error means a looked-up entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::ProductNotFound(_)
                | StoreError::UserNotFound(_)
                | StoreError::EmailNotFound
                | StoreError::SessionNotFound
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Hands out identifiers for one entity type. Never reuses a value.
#[derive(Debug)]
struct IdSequence {
    next: Id,
}

impl IdSequence {
    fn new() -> Self {
        Self { next: 1 }
    }

    fn next(&mut self) -> Id {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[derive(Debug)]
struct StoreData {
    users: BTreeMap<Id, User>,
    users_by_email: HashMap<String, Id>,
    products: BTreeMap<Id, Product>,
    orders: BTreeMap<Id, Order>,
    order_items: BTreeMap<Id, OrderItem>,
    /// token hash -> user id
    sessions: HashMap<String, Id>,

    user_ids: IdSequence,
    product_ids: IdSequence,
    order_ids: IdSequence,
    order_item_ids: IdSequence,
}

impl StoreData {
    fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            users_by_email: HashMap::new(),
            products: BTreeMap::new(),
            orders: BTreeMap::new(),
            order_items: BTreeMap::new(),
            sessions: HashMap::new(),
            user_ids: IdSequence::new(),
            product_ids: IdSequence::new(),
            order_ids: IdSequence::new(),
            order_item_ids: IdSequence::new(),
        }
    }

    /// Check every requested line against current stock without touching anything.
    fn check_order_lines(&self, lines: &[OrderLine]) -> StoreResult<()> {
        // Quantities requested so far per product, so two lines for the same
        // product cannot jointly exceed its stock.
        let mut requested: HashMap<Id, i64> = HashMap::new();

        for (line, item) in lines.iter().enumerate() {
            if item.quantity <= 0 {
                return Err(StoreError::InvalidQuantity {
                    line,
                    product_id: item.product_id,
                    quantity: item.quantity,
                });
            }

            let product = self
                .products
                .get(&item.product_id)
                .ok_or(StoreError::ProductNotFound(item.product_id))?;

            let already = requested.entry(item.product_id).or_insert(0);
            match already.checked_add(item.quantity) {
                Some(total) if total <= product.stock => *already = total,
                _ => {
                    return Err(StoreError::InsufficientStock {
                        line,
                        product_id: item.product_id,
                        requested: item.quantity,
                        available: product.stock - *already,
                    });
                }
            }
        }

        Ok(())
    }
}

/// The shared in-memory dataset.
///
/// Constructed once by the process entry point and shared behind an `Arc`.
pub struct Store {
    data: RwLock<StoreData>,
    order_tx: mpsc::Sender<Id>,
}

impl Store {
    /// Create an empty store that notifies new orders on `order_tx`.
    pub fn new(order_tx: mpsc::Sender<Id>) -> Self {
        Self {
            data: RwLock::new(StoreData::new()),
            order_tx,
        }
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    pub fn list_products(&self) -> Vec<Product> {
        self.data.read().products.values().cloned().collect()
    }

    pub fn create_product(&self, product: NewProduct) -> Product {
        let mut data = self.data.write();
        let id = data.product_ids.next();
        let product = product.into_product(id);
        data.products.insert(id, product.clone());
        product
    }

    /// Replace a product wholesale, keeping its identifier.
    pub fn update_product(&self, id: Id, product: NewProduct) -> StoreResult<Product> {
        let mut data = self.data.write();
        let slot = data
            .products
            .get_mut(&id)
            .ok_or(StoreError::ProductNotFound(id))?;
        *slot = product.into_product(id);
        Ok(slot.clone())
    }

    /// Remove a product. Order items that reference it are left as they are.
    pub fn delete_product(&self, id: Id) -> StoreResult<()> {
        self.data
            .write()
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::ProductNotFound(id))
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    pub fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut data = self.data.write();
        if data.users_by_email.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }

        let id = data.user_ids.next();
        let user = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
        };
        data.users_by_email.insert(user.email.clone(), id);
        data.users.insert(id, user.clone());
        Ok(user)
    }

    /// Exact, case-sensitive email lookup
    pub fn find_user_by_email(&self, email: &str) -> StoreResult<User> {
        let data = self.data.read();
        data.users_by_email
            .get(email)
            .and_then(|id| data.users.get(id))
            .cloned()
            .ok_or(StoreError::EmailNotFound)
    }

    pub fn get_user(&self, id: Id) -> StoreResult<User> {
        self.data
            .read()
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::UserNotFound(id))
    }

    pub fn list_users(&self) -> Vec<User> {
        self.data.read().users.values().cloned().collect()
    }

    // -------------------------------------------------------------------------
    // Sessions
    // -------------------------------------------------------------------------

    /// Insert or overwrite the mapping for `token`.
    pub fn create_session(&self, token: impl Into<String>, user_id: Id) {
        self.data.write().sessions.insert(token.into(), user_id);
    }

    /// Remove the mapping for `token` if there is one.
    pub fn delete_session(&self, token: &str) {
        self.data.write().sessions.remove(token);
    }

    pub fn resolve_session(&self, token: &str) -> StoreResult<Id> {
        self.data
            .read()
            .sessions
            .get(token)
            .copied()
            .ok_or(StoreError::SessionNotFound)
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Place an order: validate every line, then decrement stock and record the
    /// order with its items, all under one write hold.
    ///
    /// On error nothing has changed. On success the order id is offered to the
    /// background queue; if the queue is full the notification is dropped and
    /// the order still stands.
    pub fn create_order(&self, user_id: Id, lines: &[OrderLine]) -> StoreResult<OrderWithItems> {
        if lines.is_empty() {
            return Err(StoreError::EmptyItemList);
        }

        let mut data = self.data.write();

        if !data.users.contains_key(&user_id) {
            return Err(StoreError::UserNotFound(user_id));
        }

        data.check_order_lines(lines)?;

        let order = Order {
            id: data.order_ids.next(),
            user_id,
            created_at: Utc::now(),
        };
        data.orders.insert(order.id, order.clone());

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            if let Some(product) = data.products.get_mut(&line.product_id) {
                product.stock -= line.quantity;
            }

            let item = OrderItem {
                id: data.order_item_ids.next(),
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity,
            };
            data.order_items.insert(item.id, item.clone());
            items.push(item);
        }

        match self.order_tx.try_send(order.id) {
            Ok(()) => {}
            Err(TrySendError::Full(id)) => {
                tracing::warn!(order_id = id, "Order queue full, dropping background notification");
            }
            Err(TrySendError::Closed(id)) => {
                tracing::debug!(order_id = id, "Order worker gone, dropping background notification");
            }
        }

        tracing::info!(order_id = order.id, user_id, items = items.len(), "Order placed");

        Ok(OrderWithItems { order, items })
    }

    /// Every order owned by `user_id` with its items.
    pub fn get_user_orders(&self, user_id: Id) -> StoreResult<Vec<OrderWithItems>> {
        let data = self.data.read();

        if !data.users.contains_key(&user_id) {
            return Err(StoreError::UserNotFound(user_id));
        }

        let mut by_order: HashMap<Id, Vec<OrderItem>> = HashMap::new();
        for item in data.order_items.values() {
            by_order.entry(item.order_id).or_default().push(item.clone());
        }

        Ok(data
            .orders
            .values()
            .filter(|order| order.user_id == user_id)
            .map(|order| OrderWithItems {
                order: order.clone(),
                items: by_order.remove(&order.id).unwrap_or_default(),
            })
            .collect())
    }
}
