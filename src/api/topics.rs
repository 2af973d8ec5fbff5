//! Topic API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CreateTopicRequest, SetStatusRequest, Topic, TopicStats, UpdateTopicRequest,
};
use crate::notify::NotificationKind;
use crate::AppState;

/// GET /api/topics - List all topics, newest first.
pub async fn list_topics(State(state): State<AppState>) -> ApiResult<Vec<Topic>> {
    success(state.store.topics().await)
}

/// GET /api/topics/:id - Get a single topic.
pub async fn get_topic(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Topic> {
    match state.store.topic_by_id(id).await {
        Some(topic) => success(topic),
        None => Err(AppError::NotFound(format!("Topic {} not found", id))),
    }
}

/// POST /api/topics - Create a new topic.
pub async fn create_topic(
    State(state): State<AppState>,
    Json(request): Json<CreateTopicRequest>,
) -> ApiResult<Topic> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    let topic = state.store.create_topic(request).await?;
    success(topic)
}

/// PUT /api/topics/:id - Partially update a topic.
pub async fn update_topic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTopicRequest>,
) -> ApiResult<Topic> {
    match state.store.update_topic(id, &request).await? {
        Some(topic) => success(topic),
        None => Err(AppError::NotFound(format!("Topic {} not found", id))),
    }
}

/// DELETE /api/topics/:id - Delete a topic and its followups.
pub async fn delete_topic(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    if state.store.topic_by_id(id).await.is_none() {
        return Err(AppError::NotFound(format!("Topic {} not found", id)));
    }
    state.store.delete_topic(id).await?;
    success(())
}

/// PUT /api/topics/:id/status - Change a topic's status, maintaining the
/// closing-date coupling.
pub async fn set_topic_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SetStatusRequest>,
) -> ApiResult<Topic> {
    if state.store.topic_by_id(id).await.is_none() {
        return Err(AppError::NotFound(format!("Topic {} not found", id)));
    }
    match state.store.set_topic_status(id, request.status).await? {
        Some(topic) => success(topic),
        None => Err(AppError::NotFound(format!("Topic {} not found", id))),
    }
}

/// GET /api/topics/overdue - Topics that currently count as overdue.
pub async fn overdue_topics(State(state): State<AppState>) -> ApiResult<Vec<Topic>> {
    success(state.store.overdue_topics().await)
}

/// GET /api/stats - Dashboard counters.
pub async fn topic_stats(State(state): State<AppState>) -> ApiResult<TopicStats> {
    success(state.store.stats().await)
}

/// Request body for triggering a topic notification.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    #[serde(default)]
    pub kind: NotificationKind,
}

/// Outcome of a notification attempt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyOutcome {
    pub sent: bool,
}

/// POST /api/topics/:id/notify - Send the topic's department a Telegram
/// message. Delivery failures surface as `sent: false`, never as errors.
pub async fn notify_topic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<NotifyRequest>,
) -> ApiResult<NotifyOutcome> {
    let Some(topic) = state.store.topic_by_id(id).await else {
        return Err(AppError::NotFound(format!("Topic {} not found", id)));
    };

    let chat_id = state
        .store
        .departments()
        .await
        .into_iter()
        .find(|d| d.id == topic.dept_id)
        .and_then(|d| d.telegram_chat_id)
        .unwrap_or_default();
    let token = state.store.telegram_token().await;

    let sent = state
        .notifier
        .send_topic_notification(&token, &chat_id, &topic, request.kind)
        .await;
    success(NotifyOutcome { sent })
}
