//! User API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateUserRequest, UpdateUserRequest, User};
use crate::AppState;

/// GET /api/users - List all users.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.store.users().await?;
    success(users)
}

/// POST /api/users - Create a new user.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<User> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let user = state.store.create_user(request).await?;
    success(user)
}

/// PUT /api/users/:id - Partially update a user.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<User> {
    match state.store.update_user(id, &request).await? {
        Some(user) => success(user),
        None => Err(AppError::NotFound(format!("User {} not found", id))),
    }
}

/// DELETE /api/users/:id - Delete a user. Deleting the root admin is a
/// silent no-op, not an error.
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    let users = state.store.users().await?;
    if !users.iter().any(|u| u.id == id) {
        return Err(AppError::NotFound(format!("User {} not found", id)));
    }
    state.store.delete_user(id).await?;
    success(())
}
