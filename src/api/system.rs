//! System API endpoints: audit log, Telegram settings, backup and restore.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{LogEntry, SystemSnapshot};
use crate::AppState;

/// GET /api/logs - Audit trail, newest first, capped at 500 entries.
pub async fn get_logs(State(state): State<AppState>) -> ApiResult<Vec<LogEntry>> {
    success(state.store.logs().await)
}

/// DELETE /api/logs - Clear the audit trail.
pub async fn clear_logs(State(state): State<AppState>) -> ApiResult<()> {
    state.store.clear_logs().await?;
    success(())
}

/// Telegram bot token payload, both directions.
#[derive(Debug, Serialize, Deserialize)]
pub struct TelegramTokenPayload {
    #[serde(default)]
    pub token: String,
}

/// GET /api/settings/telegram-token - Read the configured bot token.
pub async fn get_telegram_token(State(state): State<AppState>) -> ApiResult<TelegramTokenPayload> {
    success(TelegramTokenPayload {
        token: state.store.telegram_token().await,
    })
}

/// PUT /api/settings/telegram-token - Replace the bot token.
pub async fn set_telegram_token(
    State(state): State<AppState>,
    Json(payload): Json<TelegramTokenPayload>,
) -> ApiResult<()> {
    state.store.set_telegram_token(payload.token).await?;
    success(())
}

/// GET /api/system/export - Full backup of every collection.
pub async fn export_system(State(state): State<AppState>) -> ApiResult<SystemSnapshot> {
    let snapshot = state.store.export_snapshot().await?;
    success(snapshot)
}

/// POST /api/system/import - Restore from a backup file. All-or-nothing:
/// a blob without topics and users arrays is rejected untouched.
pub async fn import_system(
    State(state): State<AppState>,
    Json(data): Json<Value>,
) -> ApiResult<()> {
    if !state.store.import_snapshot(data).await? {
        return Err(AppError::Validation(
            "Backup file is missing required collections".to_string(),
        ));
    }
    success(())
}

/// POST /api/system/reset - Factory reset.
pub async fn reset_system(State(state): State<AppState>) -> ApiResult<()> {
    state.store.reset_system().await?;
    success(())
}
