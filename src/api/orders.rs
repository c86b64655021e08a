use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use super::auth::{AuthUser, CurrentUser};
use super::error::ApiError;
use super::validation::validate_id;
use crate::store::{CreateOrderRequest, OrderWithItems};
use crate::AppState;

/// POST /orders
///
/// Places an order for `user_id`, or for the session's user when the body
/// omits it.
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(session_user)): CurrentUser,
    WithRejection(Json(req), _): WithRejection<Json<CreateOrderRequest>, ApiError>,
) -> Result<(StatusCode, Json<OrderWithItems>), ApiError> {
    let user_id = match req.user_id {
        Some(id) => validate_id(id).map_err(|_| ApiError::bad_request("user_id must be > 0"))?,
        None => session_user,
    };

    let placed = state
        .store
        .create_order(user_id, &req.items)
        .map_err(|e| {
            tracing::debug!(user_id, error = %e, "Order rejected");
            ApiError::from_order_error(e)
        })?;

    Ok((StatusCode::CREATED, Json(placed)))
}

/// GET /users/:id/orders
pub async fn user_orders(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<Vec<OrderWithItems>>, ApiError> {
    let orders = state.store.get_user_orders(validate_id(id)?)?;
    Ok(Json(orders))
}
