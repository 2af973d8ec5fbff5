//! Full-system backup snapshot model.

use serde::{Deserialize, Serialize};

use super::{Department, Followup, LogEntry, Topic, User};

/// Schema tag written into every exported backup.
pub const SNAPSHOT_VERSION: &str = "2.1";

/// A complete dump of every collection plus the Telegram token.
///
/// On restore only `topics` and `users` are required; the remaining fields
/// default. `departments` stays optional so a backup without the field
/// keeps the live department list instead of wiping it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSnapshot {
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub followups: Vec<Followup>,
    #[serde(default)]
    pub departments: Option<Vec<Department>>,
    pub users: Vec<User>,
    #[serde(default)]
    pub audit_logs: Vec<LogEntry>,
    #[serde(default)]
    pub telegram_token: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub version: String,
}
