use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::ApiError;
use super::validation::{validate_id, validate_product};
use crate::store::{NewProduct, Product};
use crate::AppState;

/// GET /products
pub async fn list_products(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    Json(state.store.list_products())
}

/// POST /products
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(mut req), _): WithRejection<Json<NewProduct>, ApiError>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate_product(&mut req)?;

    let product = state.store.create_product(req);
    tracing::info!(product_id = product.id, name = %product.name, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/:id
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(mut req), _): WithRejection<Json<NewProduct>, ApiError>,
) -> Result<Json<Product>, ApiError> {
    let id = validate_id(id)?;
    validate_product(&mut req)?;

    let product = state.store.update_product(id, req)?;
    tracing::info!(product_id = id, "Product updated");

    Ok(Json(product))
}

/// DELETE /products/:id
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let id = validate_id(id)?;

    state.store.delete_product(id)?;
    tracing::info!(product_id = id, "Product deleted");

    Ok(Json(json!({ "deleted": id })))
}
