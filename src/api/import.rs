//! Bulk import API endpoint.
//!
//! Accepts spreadsheet rows already parsed to JSON by the frontend and
//! maps them onto topics, growing the department list as new names appear.

use axum::{extract::State, Json};
use serde::Serialize;

use super::{success, ApiResult};
use crate::models::TopicRow;
use crate::AppState;

/// Result of a bulk import. `total` is the topic count after the import,
/// not the number of rows added; the import screen has always displayed
/// this value.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total: usize,
}

/// POST /api/import/topics - Import a batch of spreadsheet rows.
pub async fn import_topics(
    State(state): State<AppState>,
    Json(rows): Json<Vec<TopicRow>>,
) -> ApiResult<ImportSummary> {
    let mut topics = Vec::with_capacity(rows.len());
    for row in rows {
        // Resolution may create departments, so it runs row by row.
        let dept_id = state
            .store
            .resolve_department(row.responsible.as_deref().unwrap_or(""))
            .await?;
        topics.push(row.into_topic(dept_id));
    }

    let total = state.store.import_topics(topics).await?;
    success(ImportSummary { total })
}
