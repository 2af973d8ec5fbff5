//! Audit log entry model.

use serde::{Deserialize, Serialize};

/// A single audit trail entry. The actor's name is denormalized so the
/// entry stays meaningful after the user record changes or disappears.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub action: String,
    pub details: String,
    pub user_id: i64,
    pub user_name: String,
    pub timestamp: String,
}
