//! Input validation for API requests.
//!
//! The store trusts its callers, so everything a record must satisfy is
//! checked here before a store operation is invoked.

use super::error::{ApiError, ValidationErrorBuilder};
use crate::store::{Id, NewProduct};

/// Validate product fields for create or full replace.
/// Trims the name in place.
pub fn validate_product(product: &mut NewProduct) -> Result<(), ApiError> {
    product.name = product.name.trim().to_string();

    let mut errors = ValidationErrorBuilder::new();
    if product.name.is_empty() {
        errors.add("name", "name is required");
    }
    if product.stock < 0 {
        errors.add("stock", "stock must be >= 0");
    }
    if !product.price.is_finite() || product.price < 0.0 {
        errors.add("price", "price must be a non-negative number");
    }
    errors.finish()
}

/// Validate an identifier taken from the request path or body
pub fn validate_id(id: i64) -> Result<Id, ApiError> {
    if id <= 0 {
        return Err(ApiError::bad_request("invalid id"));
    }
    Ok(id as Id)
}

/// Trim each field and require all of them to be non-empty.
/// Returns the message listing the required fields when any is missing.
pub fn require_fields(fields: &mut [&mut String], message: &str) -> Result<(), ApiError> {
    for field in fields.iter_mut() {
        **field = field.trim().to_string();
    }
    if fields.iter().any(|f| f.is_empty()) {
        return Err(ApiError::bad_request(message));
    }
    Ok(())
}
