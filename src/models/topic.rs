//! Topic model matching the frontend Topic interface.
//!
//! Status and priority enums carry the Arabic wire values the frontend has
//! always stored, so existing blobs and backup files round-trip unchanged.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a topic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TopicStatus {
    #[serde(rename = "قيد المتابعة")]
    Pending,
    #[serde(rename = "مستمر")]
    Ongoing,
    #[serde(rename = "مغلقة")]
    Closed,
    #[serde(rename = "متأخرة")]
    Overdue,
    #[serde(rename = "مرحلة")]
    Phased,
    #[serde(rename = "مؤجلة")]
    Postponed,
    #[serde(rename = "متوقفة")]
    Stalled,
    #[serde(rename = "ملغية")]
    Cancelled,
}

impl TopicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicStatus::Pending => "قيد المتابعة",
            TopicStatus::Ongoing => "مستمر",
            TopicStatus::Closed => "مغلقة",
            TopicStatus::Overdue => "متأخرة",
            TopicStatus::Phased => "مرحلة",
            TopicStatus::Postponed => "مؤجلة",
            TopicStatus::Stalled => "متوقفة",
            TopicStatus::Cancelled => "ملغية",
        }
    }

    fn from_wire(s: &str) -> Option<Self> {
        match s {
            "قيد المتابعة" => Some(TopicStatus::Pending),
            "مستمر" => Some(TopicStatus::Ongoing),
            "مغلقة" => Some(TopicStatus::Closed),
            "متأخرة" => Some(TopicStatus::Overdue),
            "مرحلة" => Some(TopicStatus::Phased),
            "مؤجلة" => Some(TopicStatus::Postponed),
            "متوقفة" => Some(TopicStatus::Stalled),
            "ملغية" => Some(TopicStatus::Cancelled),
            _ => None,
        }
    }

    /// Loose mapping used by the spreadsheet import: exact Arabic wire
    /// value first, then case-insensitive English name, else Pending.
    pub fn parse_loose(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return TopicStatus::Pending;
        };
        let trimmed = value.trim();
        if let Some(status) = Self::from_wire(trimmed) {
            return status;
        }
        match trimmed.to_lowercase().as_str() {
            "closed" => TopicStatus::Closed,
            "pending" => TopicStatus::Pending,
            "ongoing" => TopicStatus::Ongoing,
            "overdue" => TopicStatus::Overdue,
            "cancelled" => TopicStatus::Cancelled,
            "stalled" => TopicStatus::Stalled,
            "postponed" => TopicStatus::Postponed,
            "phased" => TopicStatus::Phased,
            _ => TopicStatus::Pending,
        }
    }

    /// Statuses that are never reported as overdue, even past the due date.
    pub fn exempt_from_overdue(self) -> bool {
        matches!(
            self,
            TopicStatus::Closed
                | TopicStatus::Cancelled
                | TopicStatus::Phased
                | TopicStatus::Stalled
        )
    }
}

/// Priority of a topic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PriorityLevel {
    #[serde(rename = "منخفض")]
    Low,
    #[serde(rename = "عادي")]
    Normal,
    #[serde(rename = "مهم")]
    High,
    #[serde(rename = "عاجل")]
    Urgent,
}

impl PriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Low => "منخفض",
            PriorityLevel::Normal => "عادي",
            PriorityLevel::High => "مهم",
            PriorityLevel::Urgent => "عاجل",
        }
    }
}

/// A tracked task assigned to a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub topic_type: String,
    pub assignment_date: String,
    pub sender: String,
    pub dept_id: i64,
    pub priority: PriorityLevel,
    pub due_date: String,
    pub details: String,
    pub status: TopicStatus,
    pub last_updated: String,
    pub created_by: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_date: Option<String>,
}

impl Topic {
    /// Merge a partial update onto this topic. `closing_date` carries a
    /// double option so a request can distinguish "leave as is" (outer
    /// None) from "clear" (explicit null).
    pub fn apply(&mut self, request: &UpdateTopicRequest) {
        if let Some(title) = &request.title {
            self.title = title.clone();
        }
        if let Some(topic_type) = &request.topic_type {
            self.topic_type = topic_type.clone();
        }
        if let Some(assignment_date) = &request.assignment_date {
            self.assignment_date = assignment_date.clone();
        }
        if let Some(sender) = &request.sender {
            self.sender = sender.clone();
        }
        if let Some(dept_id) = request.dept_id {
            self.dept_id = dept_id;
        }
        if let Some(priority) = request.priority {
            self.priority = priority;
        }
        if let Some(due_date) = &request.due_date {
            self.due_date = due_date.clone();
        }
        if let Some(details) = &request.details {
            self.details = details.clone();
        }
        if let Some(status) = request.status {
            self.status = status;
        }
        if let Some(created_by) = request.created_by {
            self.created_by = created_by;
        }
        if let Some(closing_date) = &request.closing_date {
            self.closing_date = closing_date.clone();
        }
    }
}

/// Request body for creating a new topic. Id and lastUpdated are assigned
/// by the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub topic_type: String,
    pub assignment_date: String,
    pub sender: String,
    pub dept_id: i64,
    pub priority: PriorityLevel,
    pub due_date: String,
    pub details: String,
    pub status: TopicStatus,
    pub created_by: i64,
    #[serde(default)]
    pub closing_date: Option<String>,
}

/// Request body for partially updating an existing topic.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTopicRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub topic_type: Option<String>,
    #[serde(default)]
    pub assignment_date: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub dept_id: Option<i64>,
    #[serde(default)]
    pub priority: Option<PriorityLevel>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub status: Option<TopicStatus>,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub closing_date: Option<Option<String>>,
}

/// Present-vs-null detection for `closingDate`: a field that is present
/// (even as an explicit null) deserializes to Some, an absent field to
/// None.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Request body for the dedicated status-change endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub status: TopicStatus,
}

/// Aggregate dashboard counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_arabic_wire_values() {
        let json = serde_json::to_string(&TopicStatus::Closed).unwrap();
        assert_eq!(json, "\"مغلقة\"");
        let back: TopicStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TopicStatus::Closed);
    }

    #[test]
    fn parse_loose_accepts_english_names() {
        assert_eq!(TopicStatus::parse_loose(Some("Closed")), TopicStatus::Closed);
        assert_eq!(TopicStatus::parse_loose(Some(" stalled ")), TopicStatus::Stalled);
        assert_eq!(TopicStatus::parse_loose(Some("مغلقة")), TopicStatus::Closed);
        assert_eq!(TopicStatus::parse_loose(Some("nonsense")), TopicStatus::Pending);
        assert_eq!(TopicStatus::parse_loose(None), TopicStatus::Pending);
    }

    #[test]
    fn overdue_exemptions() {
        assert!(TopicStatus::Closed.exempt_from_overdue());
        assert!(TopicStatus::Stalled.exempt_from_overdue());
        assert!(!TopicStatus::Pending.exempt_from_overdue());
        assert!(!TopicStatus::Postponed.exempt_from_overdue());
    }

    #[test]
    fn update_clears_closing_date_with_explicit_null() {
        let mut topic = Topic {
            id: 1,
            title: "t".to_string(),
            topic_type: String::new(),
            assignment_date: "2025-01-01".to_string(),
            sender: String::new(),
            dept_id: 1,
            priority: PriorityLevel::Normal,
            due_date: "2025-02-01".to_string(),
            details: String::new(),
            status: TopicStatus::Closed,
            last_updated: "2025-01-01".to_string(),
            created_by: 1,
            closing_date: Some("2025-01-15".to_string()),
        };

        let request: UpdateTopicRequest =
            serde_json::from_str(r#"{"status":"مستمر","closingDate":null}"#).unwrap();
        topic.apply(&request);
        assert_eq!(topic.status, TopicStatus::Ongoing);
        assert_eq!(topic.closing_date, None);

        // Omitting the field leaves the date untouched.
        topic.closing_date = Some("2025-01-15".to_string());
        let request: UpdateTopicRequest = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        topic.apply(&request);
        assert_eq!(topic.closing_date, Some("2025-01-15".to_string()));
    }
}
