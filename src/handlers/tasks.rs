use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::database::models::TaskStatus;
use crate::database::store::TaskPatch;
use crate::error::ApiError;
use crate::server::AppState;

use super::parse_id;

#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    #[serde(rename = "projectId")]
    pub project_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub status: Option<String>,
    pub title: Option<String>,
}

/// GET /tasks?projectId= - list one project's tasks, newest first.
/// A missing projectId is a client error, never a scan of all tasks.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<TaskQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let project_id = parse_id(query.project_id.as_deref().unwrap_or(""), "projectId")?;

    let tasks = state.store.list_tasks(&user, project_id).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

/// POST /tasks?projectId= - create a task under a project.
/// Status always starts at backlog; nothing in the body can override it.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<TaskQuery>,
    body: Option<Json<CreateTaskRequest>>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let title = body.title.as_deref().map(str::trim).unwrap_or("");
    let raw_project_id = query.project_id.as_deref().unwrap_or("").trim();
    if raw_project_id.is_empty() || title.is_empty() {
        return Err(ApiError::bad_request("Missing projectId or title"));
    }
    let project_id = parse_id(raw_project_id, "projectId")?;

    let task = state.store.create_task(&user, project_id, title.to_string()).await?;
    Ok((StatusCode::CREATED, Json(json!({ "task": task }))))
}

/// PATCH /tasks/:id - partial update of status and/or title. A missing or
/// non-JSON body counts as an empty one, so the response stays `{error}`.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Option<Json<UpdateTaskRequest>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id, "id")?;
    let body = body.map(|Json(b)| b).unwrap_or_default();

    // A blank status string counts as absent; a non-blank one must be
    // a member of the closed enum.
    let status = match body.status.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(raw) => {
            Some(TaskStatus::parse(raw).ok_or_else(|| ApiError::bad_request("Invalid status"))?)
        }
    };

    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    if status.is_none() && title.is_none() {
        return Err(ApiError::bad_request("Missing status or title"));
    }

    let task = state.store.update_task(&user, id, TaskPatch { title, status }).await?;
    Ok(Json(json!({ "task": task })))
}

/// DELETE /tasks/:id - hard delete, idempotent: deleting a row that is
/// already gone is still a 204.
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "id")?;
    state.store.delete_task(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
