use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use super::error::ApiError;
use super::validation::validate_id;
use crate::store::UserResponse;
use crate::AppState;

/// GET /api/users
pub async fn list_users(State(state): State<Arc<AppState>>) -> Json<Vec<UserResponse>> {
    let users = state
        .store
        .list_users()
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Json(users)
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.store.get_user(validate_id(id)?)?;
    Ok(Json(UserResponse::from(user)))
}
