//! Row-to-entity mapping for the spreadsheet bulk import.
//!
//! Rows arrive already parsed to JSON by the frontend; this module owns the
//! bilingual column contract and the Excel date-serial conversion.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Deserialize;

use super::{PriorityLevel, Topic, TopicStatus};

/// A single spreadsheet row. Column headers are accepted in English or
/// Arabic; anything unrecognized is dropped by serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicRow {
    #[serde(default, rename = "TopicID", alias = "معرف الموضوع")]
    pub id: Option<i64>,
    #[serde(default, rename = "Title", alias = "المهمة")]
    pub title: Option<String>,
    #[serde(
        default,
        rename = "Responsible",
        alias = "المعني بالتنفيذ",
        alias = "القسم",
        alias = "الإدارة"
    )]
    pub responsible: Option<String>,
    #[serde(default, rename = "AssignmentDate", alias = "تاريخ التكليف")]
    pub assignment_date: Option<DateCell>,
    #[serde(default, rename = "DueDate", alias = "موعد التسليم")]
    pub due_date: Option<DateCell>,
    #[serde(default, rename = "Status", alias = "الحالة")]
    pub status: Option<String>,
    #[serde(default, rename = "Details", alias = "التفاصيل")]
    pub details: Option<String>,
    #[serde(default, rename = "ClosingDate", alias = "تاريخ الإغلاق")]
    pub closing_date: Option<DateCell>,
}

impl TopicRow {
    /// Build a topic from this row. The department id must already be
    /// resolved because resolution may create a department as it goes.
    pub fn into_topic(self, dept_id: i64) -> Topic {
        Topic {
            id: self
                .id
                .unwrap_or_else(|| rand::thread_rng().gen_range(0..100_000)),
            title: self.title.unwrap_or_else(|| "بدون عنوان".to_string()),
            topic_type: "مستورد".to_string(),
            assignment_date: cell_or_today(self.assignment_date),
            sender: "استيراد".to_string(),
            dept_id,
            priority: PriorityLevel::Normal,
            due_date: cell_or_today(self.due_date),
            details: self.details.unwrap_or_default(),
            status: TopicStatus::parse_loose(self.status.as_deref()),
            last_updated: today(),
            created_by: 1,
            closing_date: self.closing_date.map(DateCell::into_iso_date),
        }
    }
}

/// A date cell from the spreadsheet: either an Excel serial number or an
/// already-formatted string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DateCell {
    Serial(f64),
    Text(String),
}

impl DateCell {
    /// Convert to an ISO `YYYY-MM-DD` date. Excel serials count days since
    /// 1899-12-30, which is 25569 days before the Unix epoch. Blank text
    /// cells map to today.
    pub fn into_iso_date(self) -> String {
        match self {
            DateCell::Serial(serial) => {
                let unix = ((serial - 25_569.0) * 86_400.0).round() as i64;
                DateTime::from_timestamp(unix, 0)
                    .map(|dt| dt.date_naive().to_string())
                    .unwrap_or_else(today)
            }
            DateCell::Text(text) if text.trim().is_empty() => today(),
            DateCell::Text(text) => text,
        }
    }
}

fn cell_or_today(cell: Option<DateCell>) -> String {
    cell.map(DateCell::into_iso_date).unwrap_or_else(today)
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excel_serial_converts_via_1900_epoch() {
        assert_eq!(DateCell::Serial(45_292.0).into_iso_date(), "2024-01-01");
        assert_eq!(DateCell::Serial(25_569.0).into_iso_date(), "1970-01-01");
    }

    #[test]
    fn text_dates_pass_through_and_blank_maps_to_today() {
        assert_eq!(
            DateCell::Text("2025-03-04".to_string()).into_iso_date(),
            "2025-03-04"
        );
        assert_eq!(DateCell::Text("  ".to_string()).into_iso_date(), today());
    }

    #[test]
    fn row_maps_bilingual_columns() {
        let row: TopicRow = serde_json::from_str(
            r#"{"معرف الموضوع": 7, "المهمة": "متابعة العقود", "الحالة": "مغلقة", "موعد التسليم": 45292}"#,
        )
        .unwrap();
        let topic = row.into_topic(3);
        assert_eq!(topic.id, 7);
        assert_eq!(topic.title, "متابعة العقود");
        assert_eq!(topic.status, TopicStatus::Closed);
        assert_eq!(topic.due_date, "2024-01-01");
        assert_eq!(topic.dept_id, 3);
        assert_eq!(topic.topic_type, "مستورد");
        assert_eq!(topic.sender, "استيراد");
        assert_eq!(topic.closing_date, None);
    }

    #[test]
    fn row_defaults_for_missing_columns() {
        let row: TopicRow = serde_json::from_str(r#"{"Title": "Imported"}"#).unwrap();
        let topic = row.into_topic(1);
        assert_eq!(topic.status, TopicStatus::Pending);
        assert_eq!(topic.priority, PriorityLevel::Normal);
        assert_eq!(topic.assignment_date, today());
        assert_eq!(topic.created_by, 1);
    }
}
