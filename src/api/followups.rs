//! Followup API endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::models::{CreateFollowupRequest, Followup};
use crate::AppState;

/// Filters for listing followups.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowupQuery {
    /// Restrict to one topic.
    #[serde(default)]
    pub topic_id: Option<i64>,
    /// Restrict to an exact ISO date (the daily-report view).
    #[serde(default)]
    pub date: Option<String>,
}

/// GET /api/followups - List followups, optionally filtered.
pub async fn list_followups(
    State(state): State<AppState>,
    Query(query): Query<FollowupQuery>,
) -> ApiResult<Vec<Followup>> {
    let followups = state
        .store
        .followups(query.topic_id, query.date.as_deref())
        .await;
    success(followups)
}

/// POST /api/followups - Record a followup. The parent topic's status is
/// re-evaluated as a side effect; an unknown topic id is tolerated.
pub async fn create_followup(
    State(state): State<AppState>,
    Json(request): Json<CreateFollowupRequest>,
) -> ApiResult<Followup> {
    let followup = state.store.add_followup(request).await?;
    success(followup)
}
