//! Followup model: a dated progress check-in against a topic.

use serde::{Deserialize, Serialize};

/// A progress note recorded against a topic. Followups are append-only;
/// they disappear only when their parent topic is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Followup {
    pub id: i64,
    pub topic_id: i64,
    pub date: String,
    #[serde(rename = "type")]
    pub followup_type: String,
    pub notes: String,
    /// Free-text value from the fixed UI vocabulary (ممتاز, جيد جدا, ...).
    /// Stored as entered, not validated.
    pub progress_level: String,
    pub evaluator_id: i64,
    /// Free text scanned for completion keywords by the status engine.
    pub result_text: String,
}

/// Request body for recording a new followup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFollowupRequest {
    pub topic_id: i64,
    pub date: String,
    #[serde(rename = "type")]
    pub followup_type: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub progress_level: String,
    pub evaluator_id: i64,
    #[serde(default)]
    pub result_text: String,
}
