//! Department model. Departments can be created implicitly when an import
//! row or entry form mentions a name the store has not seen before.

use serde::{Deserialize, Serialize};

/// An organizational unit that topics are assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_chat_id: Option<String>,
}

/// Request body for partially updating a department.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
}

/// Request body for name-based department resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveDepartmentRequest {
    #[serde(default)]
    pub name: String,
}

/// Response payload for department resolution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDepartment {
    pub dept_id: i64,
}
