//! Product models.

use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub name: String,
    pub category: String,
    pub stock: i64,
    pub price: f64,
}

/// Product fields supplied by a caller for create or full replace.
/// Any identifier in the request body is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub price: f64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, category: impl Into<String>, stock: i64, price: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            stock,
            price,
        }
    }

    pub(crate) fn into_product(self, id: Id) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            stock: self.stock,
            price: self.price,
        }
    }
}
