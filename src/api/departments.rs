//! Department API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    Department, ResolveDepartmentRequest, ResolvedDepartment, UpdateDepartmentRequest,
};
use crate::AppState;

/// GET /api/departments - List all departments.
pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    success(state.store.departments().await)
}

/// PUT /api/departments/:id - Partially update a department.
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDepartmentRequest>,
) -> ApiResult<Department> {
    match state.store.update_department(id, &request).await? {
        Some(department) => success(department),
        None => Err(AppError::NotFound(format!("Department {} not found", id))),
    }
}

/// POST /api/departments/resolve - Resolve a free-text department name to
/// an id, creating the department if the name is new. Never fails: empty
/// input maps to the general department.
pub async fn resolve_department(
    State(state): State<AppState>,
    Json(request): Json<ResolveDepartmentRequest>,
) -> ApiResult<ResolvedDepartment> {
    let dept_id = state.store.resolve_department(&request.name).await?;
    success(ResolvedDepartment { dept_id })
}
