//! Order and order line models.
//!
//! Orders and their items are immutable once placed. An item's `product_id`
//! may name a product that has since been deleted; readers must treat a
//! missing product as expected history, not corruption.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Id,
    pub user_id: Id,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Id,
    pub order_id: Id,
    pub product_id: Id,
    pub quantity: i64,
}

/// One requested line of an order, before placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: Id,
    pub quantity: i64,
}

impl OrderLine {
    pub fn new(product_id: Id, quantity: i64) -> Self {
        Self { product_id, quantity }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Defaults to the user owning the session.
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}
