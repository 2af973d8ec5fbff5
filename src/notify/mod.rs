//! Telegram notification trigger.
//!
//! Formats the fixed bilingual task template and hands it to the Telegram
//! bot API. Delivery is strictly best-effort: every failure path reports
//! false to the caller; nothing here can fail the core.

use serde::Deserialize;
use serde_json::json;

use crate::models::Topic;

/// What kind of message to send for a topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    New,
    Reminder,
}

/// Minimal slice of the Telegram sendMessage response.
#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    #[serde(default)]
    ok: bool,
}

/// Outbound Telegram client.
pub struct Notifier {
    client: reqwest::Client,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Format and send the task message for a topic to a department chat.
    pub async fn send_topic_notification(
        &self,
        token: &str,
        chat_id: &str,
        topic: &Topic,
        kind: NotificationKind,
    ) -> bool {
        let text = format_topic_message(topic, kind);
        self.send_message(token, chat_id, &text).await
    }

    /// Send raw HTML text to a chat. Reports whether Telegram accepted it.
    pub async fn send_message(&self, token: &str, chat_id: &str, text: &str) -> bool {
        if token.is_empty() {
            tracing::warn!("Telegram token is not configured");
            return false;
        }
        if chat_id.is_empty() {
            tracing::warn!("Telegram chat id is missing");
            return false;
        }

        let url = format!("https://api.telegram.org/bot{}/sendMessage", token);
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "HTML"
            }))
            .send()
            .await;

        match response {
            Ok(response) => match response.json::<SendMessageResponse>().await {
                Ok(body) => body.ok,
                Err(err) => {
                    tracing::warn!("Telegram response did not parse: {}", err);
                    false
                }
            },
            Err(err) => {
                tracing::warn!("Telegram send failed: {}", err);
                false
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed bilingual template sent for task notifications.
pub fn format_topic_message(topic: &Topic, kind: NotificationKind) -> String {
    let (icon, heading) = match kind {
        NotificationKind::New => ("🆕", "مهمة جديدة"),
        NotificationKind::Reminder => ("⏰", "تذكير بمهمة"),
    };

    format!(
        "<b>{icon} {heading}</b>\n\n\
         <b>العنوان:</b> {title}\n\
         <b>الأولوية:</b> {priority}\n\
         <b>المرسل:</b> {sender}\n\
         <b>موعد التسليم:</b> {due}\n\n\
         <b>التفاصيل:</b>\n{details}\n\n\
         <i>يرجى المتابعة والإنجاز.</i>",
        icon = icon,
        heading = heading,
        title = topic.title,
        priority = topic.priority.as_str(),
        sender = topic.sender,
        due = topic.due_date,
        details = topic.details,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriorityLevel, TopicStatus};

    fn sample_topic() -> Topic {
        Topic {
            id: 42,
            title: "تحديث الموقع".to_string(),
            topic_type: "مشروع".to_string(),
            assignment_date: "2025-05-01".to_string(),
            sender: "الديوان".to_string(),
            dept_id: 2,
            priority: PriorityLevel::Urgent,
            due_date: "2025-06-01".to_string(),
            details: "إطلاق النسخة الجديدة".to_string(),
            status: TopicStatus::Ongoing,
            last_updated: "2025-05-01".to_string(),
            created_by: 1,
            closing_date: None,
        }
    }

    #[test]
    fn message_carries_topic_fields_and_kind_header() {
        let new = format_topic_message(&sample_topic(), NotificationKind::New);
        assert!(new.contains("مهمة جديدة"));
        assert!(new.contains("تحديث الموقع"));
        assert!(new.contains("عاجل"));
        assert!(new.contains("2025-06-01"));

        let reminder = format_topic_message(&sample_topic(), NotificationKind::Reminder);
        assert!(reminder.contains("تذكير بمهمة"));
        assert!(reminder.contains("⏰"));
    }

    #[tokio::test]
    async fn send_without_token_or_chat_reports_false() {
        let notifier = Notifier::new();
        assert!(!notifier.send_message("", "chat", "text").await);
        assert!(!notifier.send_message("token", "", "text").await);
    }
}
