//! Session API endpoints.
//!
//! The session models who is acting inside the app; it is independent of
//! the PSK guard on the service surface.

use axum::{extract::State, Json};
use serde::Serialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{LoginRequest, User};
use crate::AppState;

/// Current session description.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// POST /api/session/login - Start a session for a known user.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<User> {
    if !state.store.login(request.user_id).await? {
        return Err(AppError::Unauthorized(format!(
            "Unknown user id {}",
            request.user_id
        )));
    }
    match state.store.current_user().await {
        Some(user) => success(user),
        None => Err(AppError::NotFound("No users available".to_string())),
    }
}

/// POST /api/session/logout - End the current session.
pub async fn logout(State(state): State<AppState>) -> ApiResult<()> {
    state.store.logout().await?;
    success(())
}

/// GET /api/session/current - The acting user. Falls back to the first
/// user on record when no session is active.
pub async fn current_session(State(state): State<AppState>) -> ApiResult<SessionInfo> {
    let authenticated = state.store.is_authenticated().await;
    let user = state.store.current_user().await;
    success(SessionInfo {
        authenticated,
        user,
    })
}
