//! In-memory data store and rules engine.
//!
//! All collections live behind one async mutex and are mirrored into the
//! blob store on every mutation (write-through, one JSON blob per
//! collection). Reads hand out owned clones so callers can never reach the
//! working copy. The store assumes a single active session; there is no
//! transaction model beyond last-writer-wins at the blob level.

use std::collections::HashSet;

use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::BlobStore;
use crate::errors::AppError;
use crate::models::{
    CreateFollowupRequest, CreateTopicRequest, CreateUserRequest, Department, Followup, LogEntry,
    SystemSnapshot, Topic, TopicStats, TopicStatus, UpdateDepartmentRequest, UpdateTopicRequest,
    UpdateUserRequest, User, UserRole, SNAPSHOT_VERSION,
};

/// Blob keys, one per persisted collection.
pub mod keys {
    pub const TOPICS: &str = "topics";
    pub const FOLLOWUPS: &str = "followups";
    pub const DEPARTMENTS: &str = "departments";
    pub const USERS: &str = "users";
    pub const AUDIT_LOGS: &str = "auditLogs";
    pub const TELEGRAM_TOKEN: &str = "telegramToken";
    pub const SESSION_USER: &str = "currentSessionUserId";
}

/// Audit action names, kept verbatim from the frontend wire vocabulary.
pub mod actions {
    pub const LOGIN: &str = "تسجيل دخول";
    pub const LOGOUT: &str = "تسجيل خروج";
    pub const ADD_TOPIC: &str = "إضافة مهمة";
    pub const UPDATE_TOPIC: &str = "تحديث مهمة";
    pub const DELETE_TOPIC: &str = "حذف مهمة";
    pub const SET_STATUS: &str = "تغيير حالة";
    pub const ADD_FOLLOWUP: &str = "إضافة متابعة";
    pub const ADD_DEPARTMENT: &str = "إضافة إدارة";
    pub const UPDATE_DEPARTMENT: &str = "تحديث إدارة";
    pub const ADD_USER: &str = "إضافة مستخدم";
    pub const UPDATE_USER: &str = "تحديث مستخدم";
    pub const DELETE_USER: &str = "حذف مستخدم";
    pub const UPDATE_SETTINGS: &str = "تحديث إعدادات";
    pub const EXPORT_BACKUP: &str = "نسخ احتياطي";
    pub const RESTORE_SYSTEM: &str = "استعادة نظام";
    pub const IMPORT_DATA: &str = "استيراد بيانات";
    pub const RESET_SYSTEM: &str = "إعادة ضبط";
}

/// Most recent audit entries kept in memory and on disk.
const AUDIT_LOG_CAP: usize = 500;

/// Result-text substrings that mark a followup as completing its topic.
/// Plain substring matching: "لم يتم" also matches "تم", and that behavior
/// is part of the stored-data contract.
const COMPLETION_KEYWORDS: [&str; 4] = ["انجز", "منجز", "مكتمل", "تم"];

/// Progress levels that indicate healthy progress.
const PROGRESS_HEALTHY: [&str; 4] = ["ممتاز", "جيد جدا", "جيد", "مقبول"];
/// Progress levels that push a topic back to pending.
const PROGRESS_WEAK: [&str; 2] = ["ضعيف", "سيئ"];
/// Progress levels that stall a topic (both spellings occur in real data).
const PROGRESS_STALLED: [&str; 2] = ["متوقف", "توقف"];
/// Progress level that cancels a topic.
const PROGRESS_CANCELLED: &str = "ملغي";

/// Current ISO date, UTC.
fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

fn random_topic_id() -> i64 {
    rand::thread_rng().gen_range(1_000..101_000)
}

fn random_followup_id() -> i64 {
    rand::thread_rng().gen_range(0..100_000)
}

fn random_user_id() -> i64 {
    rand::thread_rng().gen_range(0..10_000)
}

/// The four departments every fresh installation starts with.
fn seed_departments() -> Vec<Department> {
    vec![
        Department {
            id: 1,
            name: "الإدارة العامة".to_string(),
            email: "admin@company.com".to_string(),
            telegram_chat_id: Some(String::new()),
        },
        Department {
            id: 2,
            name: "قسم التطوير".to_string(),
            email: "dev@company.com".to_string(),
            telegram_chat_id: Some(String::new()),
        },
        Department {
            id: 3,
            name: "قسم الدعم الفني".to_string(),
            email: "support@company.com".to_string(),
            telegram_chat_id: Some(String::new()),
        },
        Department {
            id: 4,
            name: "الموارد البشرية".to_string(),
            email: "hr@company.com".to_string(),
            telegram_chat_id: Some(String::new()),
        },
    ]
}

/// The protected root admin, restored whenever the user list runs empty.
fn default_users() -> Vec<User> {
    vec![User {
        id: 1,
        name: "مدير النظام".to_string(),
        email: "admin@company.com".to_string(),
        role: UserRole::Admin,
        dept_id: Some(1),
        is_active: true,
    }]
}

/// Candidate status for a topic after a followup. The progress level maps
/// through a fixed table; a completion keyword in the result text always
/// wins over the table.
fn next_status(current: TopicStatus, progress_level: &str, result_text: &str) -> TopicStatus {
    let completed = COMPLETION_KEYWORDS.iter().any(|kw| result_text.contains(kw));

    let candidate = if PROGRESS_HEALTHY.contains(&progress_level) {
        if completed {
            TopicStatus::Closed
        } else {
            TopicStatus::Ongoing
        }
    } else if PROGRESS_WEAK.contains(&progress_level) {
        TopicStatus::Pending
    } else if progress_level == PROGRESS_CANCELLED {
        TopicStatus::Cancelled
    } else if PROGRESS_STALLED.contains(&progress_level) {
        TopicStatus::Stalled
    } else {
        current
    };

    if completed {
        TopicStatus::Closed
    } else {
        candidate
    }
}

fn is_overdue(topic: &Topic, today: &str) -> bool {
    topic.status == TopicStatus::Overdue
        || (topic.due_date.as_str() < today && !topic.status.exempt_from_overdue())
}

#[derive(Default)]
struct State {
    topics: Vec<Topic>,
    followups: Vec<Followup>,
    departments: Vec<Department>,
    users: Vec<User>,
    audit_logs: Vec<LogEntry>,
    telegram_token: String,
    session_user_id: Option<i64>,
}

/// Process-wide data store. Constructed once in `main` and shared through
/// the application state.
pub struct Store {
    blobs: BlobStore,
    state: Mutex<State>,
}

impl Store {
    /// Load every collection from the blob store, seeding defaults for
    /// missing or unreadable blobs.
    pub async fn open(blobs: BlobStore) -> Result<Self, AppError> {
        let topics = blobs.get_json_or(keys::TOPICS, Vec::new).await?;
        let followups = blobs.get_json_or(keys::FOLLOWUPS, Vec::new).await?;
        let departments = blobs
            .get_json_or(keys::DEPARTMENTS, seed_departments)
            .await?;
        let mut users: Vec<User> = blobs.get_json_or(keys::USERS, default_users).await?;
        if users.is_empty() {
            users = default_users();
        }
        let audit_logs = blobs.get_json_or(keys::AUDIT_LOGS, Vec::new).await?;
        let telegram_token = blobs
            .get_raw(keys::TELEGRAM_TOKEN)
            .await?
            .unwrap_or_default();
        // A stale session pointer (user deleted since) is dropped here.
        let session_user_id = blobs
            .get_raw(keys::SESSION_USER)
            .await?
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|id| users.iter().any(|u| u.id == *id));

        Ok(Self {
            blobs,
            state: Mutex::new(State {
                topics,
                followups,
                departments,
                users,
                audit_logs,
                telegram_token,
                session_user_id,
            }),
        })
    }

    // ==================== AUDIT LOG ====================

    /// Append an audit entry stamped with the session actor (or "System"),
    /// evicting past the cap, and persist the log blob.
    async fn append_log(
        &self,
        state: &mut State,
        action: &str,
        details: String,
    ) -> Result<(), AppError> {
        let (user_id, user_name) = match state
            .session_user_id
            .and_then(|id| state.users.iter().find(|u| u.id == id))
        {
            Some(user) => (user.id, user.name.clone()),
            None => (0, "System".to_string()),
        };

        let entry = LogEntry {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            details,
            user_id,
            user_name,
            timestamp: Utc::now().to_rfc3339(),
        };
        state.audit_logs.insert(0, entry);
        state.audit_logs.truncate(AUDIT_LOG_CAP);
        self.blobs.put_json(keys::AUDIT_LOGS, &state.audit_logs).await
    }

    /// Record an audit entry on behalf of a collaborator outside the store.
    pub async fn log_action(&self, action: &str, details: String) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        self.append_log(&mut state, action, details).await
    }

    pub async fn logs(&self) -> Vec<LogEntry> {
        self.state.lock().await.audit_logs.clone()
    }

    pub async fn clear_logs(&self) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        state.audit_logs.clear();
        self.blobs.put_json(keys::AUDIT_LOGS, &state.audit_logs).await
    }

    // ==================== SESSION ====================

    /// Start a session for a known user. Unknown ids change nothing and
    /// report false.
    pub async fn login(&self, user_id: i64) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        let Some(user) = state.users.iter().find(|u| u.id == user_id).cloned() else {
            return Ok(false);
        };
        state.session_user_id = Some(user.id);
        self.blobs
            .put_raw(keys::SESSION_USER, &user.id.to_string())
            .await?;
        self.append_log(&mut state, actions::LOGIN, format!("المستخدم: {}", user.name))
            .await?;
        Ok(true)
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        let outgoing = state
            .session_user_id
            .and_then(|id| state.users.iter().find(|u| u.id == id).cloned());
        if let Some(user) = outgoing {
            self.append_log(&mut state, actions::LOGOUT, format!("المستخدم: {}", user.name))
                .await?;
        }
        state.session_user_id = None;
        self.blobs.delete(keys::SESSION_USER).await
    }

    /// The session user, falling back to the first user on record so a
    /// missing session never crashes a read path. The fallback is never
    /// persisted as a session.
    pub async fn current_user(&self) -> Option<User> {
        let state = self.state.lock().await;
        state
            .session_user_id
            .and_then(|id| state.users.iter().find(|u| u.id == id))
            .or_else(|| state.users.first())
            .cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.session_user_id.is_some()
    }

    // ==================== TELEGRAM SETTINGS ====================

    pub async fn telegram_token(&self) -> String {
        self.state.lock().await.telegram_token.clone()
    }

    pub async fn set_telegram_token(&self, token: String) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        state.telegram_token = token;
        self.blobs
            .put_raw(keys::TELEGRAM_TOKEN, &state.telegram_token)
            .await?;
        self.append_log(
            &mut state,
            actions::UPDATE_SETTINGS,
            "تم تحديث توكن تيليجرام".to_string(),
        )
        .await
    }

    // ==================== DEPARTMENTS ====================

    pub async fn departments(&self) -> Vec<Department> {
        self.state.lock().await.departments.clone()
    }

    pub async fn update_department(
        &self,
        id: i64,
        request: &UpdateDepartmentRequest,
    ) -> Result<Option<Department>, AppError> {
        let mut state = self.state.lock().await;
        let updated = match state.departments.iter_mut().find(|d| d.id == id) {
            Some(dept) => {
                if let Some(name) = &request.name {
                    dept.name = name.clone();
                }
                if let Some(email) = &request.email {
                    dept.email = email.clone();
                }
                if let Some(chat_id) = &request.telegram_chat_id {
                    dept.telegram_chat_id = Some(chat_id.clone());
                }
                Some(dept.clone())
            }
            None => None,
        };
        self.blobs
            .put_json(keys::DEPARTMENTS, &state.departments)
            .await?;
        self.append_log(
            &mut state,
            actions::UPDATE_DEPARTMENT,
            format!("تحديث بيانات الإدارة رقم {}", id),
        )
        .await?;
        Ok(updated)
    }

    /// Find a department by name or create one on the spot. Empty input
    /// maps to the general department (id 1) without creating anything.
    ///
    /// The max id is recomputed on every call, so a batch introducing
    /// several new names gets consecutive unique ids.
    pub async fn resolve_department(&self, raw_name: &str) -> Result<i64, AppError> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Ok(1);
        }

        let mut state = self.state.lock().await;
        let needle = name.to_lowercase();
        if let Some(existing) = state
            .departments
            .iter()
            .find(|d| d.name.trim().to_lowercase() == needle)
        {
            return Ok(existing.id);
        }

        let new_id = state.departments.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        state.departments.push(Department {
            id: new_id,
            name: name.to_string(),
            email: String::new(),
            telegram_chat_id: None,
        });
        self.blobs
            .put_json(keys::DEPARTMENTS, &state.departments)
            .await?;
        self.append_log(
            &mut state,
            actions::ADD_DEPARTMENT,
            format!("إضافة إدارة جديدة: {}", name),
        )
        .await?;
        Ok(new_id)
    }

    // ==================== TOPICS ====================

    pub async fn topics(&self) -> Vec<Topic> {
        self.state.lock().await.topics.clone()
    }

    pub async fn topic_by_id(&self, id: i64) -> Option<Topic> {
        self.state
            .lock()
            .await
            .topics
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    /// Create a topic with a fresh random id. Ids are not collision-checked
    /// at single-create time; only the bulk import dedups.
    pub async fn create_topic(&self, request: CreateTopicRequest) -> Result<Topic, AppError> {
        let mut state = self.state.lock().await;
        let topic = Topic {
            id: random_topic_id(),
            title: request.title,
            topic_type: request.topic_type,
            assignment_date: request.assignment_date,
            sender: request.sender,
            dept_id: request.dept_id,
            priority: request.priority,
            due_date: request.due_date,
            details: request.details,
            status: request.status,
            last_updated: today(),
            created_by: request.created_by,
            closing_date: request.closing_date,
        };
        state.topics.insert(0, topic.clone());
        self.blobs.put_json(keys::TOPICS, &state.topics).await?;
        self.append_log(
            &mut state,
            actions::ADD_TOPIC,
            format!("تم إضافة المهمة: {}", topic.title),
        )
        .await?;
        Ok(topic)
    }

    /// Merge partial fields onto a topic and stamp lastUpdated. A miss on
    /// the id is not an error; the audit entry is written either way.
    pub async fn update_topic(
        &self,
        id: i64,
        request: &UpdateTopicRequest,
    ) -> Result<Option<Topic>, AppError> {
        let mut state = self.state.lock().await;
        let old_title = state
            .topics
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.title.clone())
            .unwrap_or_default();
        let updated = match state.topics.iter_mut().find(|t| t.id == id) {
            Some(topic) => {
                topic.apply(request);
                topic.last_updated = today();
                Some(topic.clone())
            }
            None => None,
        };
        self.blobs.put_json(keys::TOPICS, &state.topics).await?;
        self.append_log(
            &mut state,
            actions::UPDATE_TOPIC,
            format!("تعديل المهمة #{} - {}", id, old_title),
        )
        .await?;
        Ok(updated)
    }

    /// Delete a topic and cascade to its followups.
    pub async fn delete_topic(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        let title = state
            .topics
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.title.clone())
            .unwrap_or_else(|| id.to_string());
        state.topics.retain(|t| t.id != id);
        state.followups.retain(|f| f.topic_id != id);
        self.blobs.put_json(keys::TOPICS, &state.topics).await?;
        self.blobs.put_json(keys::FOLLOWUPS, &state.followups).await?;
        self.append_log(
            &mut state,
            actions::DELETE_TOPIC,
            format!("تم حذف المهمة: {}", title),
        )
        .await?;
        Ok(())
    }

    /// Set a topic's status, keeping the closing-date coupling: Closed
    /// stamps today, every other status clears the date.
    pub async fn set_topic_status(
        &self,
        id: i64,
        status: TopicStatus,
    ) -> Result<Option<Topic>, AppError> {
        let closing_date = if status == TopicStatus::Closed {
            Some(today())
        } else {
            None
        };
        let request = UpdateTopicRequest {
            status: Some(status),
            closing_date: Some(closing_date),
            ..UpdateTopicRequest::default()
        };
        let updated = self.update_topic(id, &request).await?;

        let mut state = self.state.lock().await;
        self.append_log(
            &mut state,
            actions::SET_STATUS,
            format!("تغيير حالة المهمة #{} إلى {}", id, status.as_str()),
        )
        .await?;
        Ok(updated)
    }

    /// Topics that count as overdue: either stored as Overdue, or past
    /// their due date without an exempting status. Dates compare as plain
    /// strings, which is correct for fixed-width ISO dates.
    pub async fn overdue_topics(&self) -> Vec<Topic> {
        let today = today();
        let state = self.state.lock().await;
        state
            .topics
            .iter()
            .filter(|t| is_overdue(t, &today))
            .cloned()
            .collect()
    }

    pub async fn stats(&self) -> TopicStats {
        let today = today();
        let state = self.state.lock().await;
        TopicStats {
            total: state.topics.len(),
            completed: state
                .topics
                .iter()
                .filter(|t| t.status == TopicStatus::Closed)
                .count(),
            pending: state
                .topics
                .iter()
                .filter(|t| {
                    t.status == TopicStatus::Ongoing || t.status == TopicStatus::Pending
                })
                .count(),
            overdue: state.topics.iter().filter(|t| is_overdue(t, &today)).count(),
        }
    }

    // ==================== FOLLOWUPS ====================

    pub async fn followups(&self, topic_id: Option<i64>, date: Option<&str>) -> Vec<Followup> {
        let state = self.state.lock().await;
        state
            .followups
            .iter()
            .filter(|f| topic_id.map_or(true, |id| f.topic_id == id))
            .filter(|f| date.map_or(true, |d| f.date == d))
            .cloned()
            .collect()
    }

    /// Append a followup, then run the status auto-transition on its parent
    /// topic. A missing parent is tolerated: the followup is still stored.
    pub async fn add_followup(
        &self,
        request: CreateFollowupRequest,
    ) -> Result<Followup, AppError> {
        let followup = Followup {
            id: random_followup_id(),
            topic_id: request.topic_id,
            date: request.date,
            followup_type: request.followup_type,
            notes: request.notes,
            progress_level: request.progress_level,
            evaluator_id: request.evaluator_id,
            result_text: request.result_text,
        };

        let parent_status = {
            let mut state = self.state.lock().await;
            state.followups.insert(0, followup.clone());
            self.blobs.put_json(keys::FOLLOWUPS, &state.followups).await?;
            state
                .topics
                .iter()
                .find(|t| t.id == followup.topic_id)
                .map(|t| t.status)
        };

        if let Some(current) = parent_status {
            let next = next_status(current, &followup.progress_level, &followup.result_text);
            self.set_topic_status(followup.topic_id, next).await?;
        }

        let mut state = self.state.lock().await;
        self.append_log(
            &mut state,
            actions::ADD_FOLLOWUP,
            format!("متابعة للمهمة #{}", followup.topic_id),
        )
        .await?;
        Ok(followup)
    }

    // ==================== USERS ====================

    /// All users. An empty collection is reseeded with the default admin so
    /// the system always has someone to act as.
    pub async fn users(&self) -> Result<Vec<User>, AppError> {
        let mut state = self.state.lock().await;
        if state.users.is_empty() {
            state.users = default_users();
            self.blobs.put_json(keys::USERS, &state.users).await?;
        }
        Ok(state.users.clone())
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, AppError> {
        let mut state = self.state.lock().await;
        let user = User {
            id: random_user_id(),
            name: request.name,
            email: request.email,
            role: request.role,
            dept_id: request.dept_id,
            is_active: request.is_active,
        };
        state.users.push(user.clone());
        self.blobs.put_json(keys::USERS, &state.users).await?;
        self.append_log(
            &mut state,
            actions::ADD_USER,
            format!("تم إضافة المستخدم: {}", user.name),
        )
        .await?;
        Ok(user)
    }

    pub async fn update_user(
        &self,
        id: i64,
        request: &UpdateUserRequest,
    ) -> Result<Option<User>, AppError> {
        let mut state = self.state.lock().await;
        let updated = match state.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                if let Some(name) = &request.name {
                    user.name = name.clone();
                }
                if let Some(email) = &request.email {
                    user.email = email.clone();
                }
                if let Some(role) = request.role {
                    user.role = role;
                }
                if let Some(dept_id) = request.dept_id {
                    user.dept_id = Some(dept_id);
                }
                if let Some(is_active) = request.is_active {
                    user.is_active = is_active;
                }
                Some(user.clone())
            }
            None => None,
        };
        self.blobs.put_json(keys::USERS, &state.users).await?;
        self.append_log(
            &mut state,
            actions::UPDATE_USER,
            format!("تحديث بيانات المستخدم #{}", id),
        )
        .await?;
        Ok(updated)
    }

    /// Delete a user. The root admin (id 1) can never be removed; that call
    /// is a silent no-op.
    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        if id == 1 {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        let name = state
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| id.to_string());
        state.users.retain(|u| u.id != id);
        self.blobs.put_json(keys::USERS, &state.users).await?;
        self.append_log(
            &mut state,
            actions::DELETE_USER,
            format!("تم حذف المستخدم: {}", name),
        )
        .await?;
        Ok(())
    }

    // ==================== BACKUP & RESTORE ====================

    /// Full-fidelity dump of everything in memory. The export action is
    /// logged first so the entry itself appears in the dump.
    pub async fn export_snapshot(&self) -> Result<SystemSnapshot, AppError> {
        let mut state = self.state.lock().await;
        self.append_log(
            &mut state,
            actions::EXPORT_BACKUP,
            "تم تصدير نسخة احتياطية للنظام".to_string(),
        )
        .await?;
        Ok(SystemSnapshot {
            topics: state.topics.clone(),
            followups: state.followups.clone(),
            departments: Some(state.departments.clone()),
            users: state.users.clone(),
            audit_logs: state.audit_logs.clone(),
            telegram_token: state.telegram_token.clone(),
            timestamp: Utc::now().to_rfc3339(),
            version: SNAPSHOT_VERSION.to_string(),
        })
    }

    /// Restore the whole system from a backup blob. `topics` and `users`
    /// must be arrays; everything else is optional. Invalid input leaves
    /// the store untouched and reports false.
    pub async fn import_snapshot(&self, data: Value) -> Result<bool, AppError> {
        let topics_ok = data.get("topics").is_some_and(Value::is_array);
        let users_ok = data.get("users").is_some_and(Value::is_array);
        if !topics_ok || !users_ok {
            return Ok(false);
        }
        let snapshot: SystemSnapshot = match serde_json::from_value(data) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!("Rejected malformed backup file: {}", err);
                return Ok(false);
            }
        };

        let mut state = self.state.lock().await;
        state.topics = snapshot.topics;
        state.followups = snapshot.followups;
        if let Some(departments) = snapshot.departments {
            state.departments = departments;
        }
        state.users = snapshot.users;
        state.audit_logs = snapshot.audit_logs;
        state.audit_logs.truncate(AUDIT_LOG_CAP);

        if !snapshot.telegram_token.is_empty() {
            state.telegram_token = snapshot.telegram_token;
            self.blobs
                .put_raw(keys::TELEGRAM_TOKEN, &state.telegram_token)
                .await?;
            self.append_log(
                &mut state,
                actions::UPDATE_SETTINGS,
                "تم تحديث توكن تيليجرام".to_string(),
            )
            .await?;
        }

        self.blobs.put_json(keys::TOPICS, &state.topics).await?;
        self.blobs.put_json(keys::FOLLOWUPS, &state.followups).await?;
        self.blobs
            .put_json(keys::DEPARTMENTS, &state.departments)
            .await?;
        self.blobs.put_json(keys::USERS, &state.users).await?;
        self.append_log(
            &mut state,
            actions::RESTORE_SYSTEM,
            "تم استعادة النظام من نسخة احتياطية".to_string(),
        )
        .await?;
        Ok(true)
    }

    /// Factory reset. The reset is logged before the logs are cleared, so
    /// the action is visible only in exports taken beforehand.
    pub async fn reset_system(&self) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        self.append_log(
            &mut state,
            actions::RESET_SYSTEM,
            "تم إعادة ضبط النظام للمصنع".to_string(),
        )
        .await?;

        state.topics.clear();
        state.followups.clear();
        state.departments = seed_departments();
        state.users = default_users();
        state.audit_logs.clear();
        state.telegram_token.clear();
        state.session_user_id = None;

        for key in [
            keys::TOPICS,
            keys::FOLLOWUPS,
            keys::DEPARTMENTS,
            keys::USERS,
            keys::AUDIT_LOGS,
            keys::TELEGRAM_TOKEN,
            keys::SESSION_USER,
        ] {
            self.blobs.delete(key).await?;
        }
        Ok(())
    }

    // ==================== BULK IMPORT ====================

    /// Import externally-mapped topics, skipping ids already in the store.
    /// Duplicate ids inside the batch itself are NOT collapsed; that
    /// matches what the import screen has always done. Returns the total
    /// topic count after the import, not the number added.
    pub async fn import_topics(&self, incoming: Vec<Topic>) -> Result<usize, AppError> {
        let mut state = self.state.lock().await;
        let existing: HashSet<i64> = state.topics.iter().map(|t| t.id).collect();
        let fresh: Vec<Topic> = incoming
            .into_iter()
            .filter(|t| !existing.contains(&t.id))
            .collect();
        let added = fresh.len();

        let mut merged = fresh;
        merged.extend(state.topics.drain(..));
        state.topics = merged;

        self.blobs.put_json(keys::TOPICS, &state.topics).await?;
        self.append_log(
            &mut state,
            actions::IMPORT_DATA,
            format!("تم استيراد {} مهمة من ملف خارجي", added),
        )
        .await?;
        Ok(state.topics.len())
    }
}
