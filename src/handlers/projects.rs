use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::database::models::ProjectStatus;
use crate::database::store::{NewProject, ProjectPatch};
use crate::error::ApiError;
use crate::server::AppState;

use super::parse_id;

#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    /// Optional `?id=` form: the collection route doubles as get-by-id.
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// GET /projects - list the caller's projects, newest first.
/// With `?id=` behaves as get-by-id, matching the legacy query form.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ProjectQuery>,
) -> Result<Response, ApiError> {
    if let Some(raw) = query.id.as_deref() {
        let id = parse_id(raw, "id")?;
        let project = state.store.get_project(&user, id).await?;
        return Ok(Json(json!({ "project": project })).into_response());
    }

    let projects = state.store.list_projects(&user).await?;
    Ok(Json(json!({ "projects": projects })).into_response())
}

/// GET /projects/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id, "id")?;
    let project = state.store.get_project(&user, id).await?;
    Ok(Json(json!({ "project": project })))
}

/// POST /projects - create a project owned by the caller.
/// A missing or non-JSON body counts as an empty one, so field validation
/// decides the error message and the `{error}` shape holds.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Option<Json<CreateProjectRequest>>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing title"))?;

    let status = match body.status.as_deref() {
        Some(raw) => ProjectStatus::parse(raw).ok_or_else(|| ApiError::bad_request("Invalid status"))?,
        None => ProjectStatus::Active,
    };

    let id = state
        .store
        .create_project(
            &user,
            NewProject {
                title: title.to_string(),
                description: body.description,
                status,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// PATCH /projects/:id - partial update of title/description/status.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Option<Json<UpdateProjectRequest>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id, "id")?;
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let title = match body.title.as_deref() {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ApiError::bad_request("Missing title"));
            }
            Some(trimmed.to_string())
        }
        None => None,
    };

    let status = match body.status.as_deref() {
        Some(raw) => {
            Some(ProjectStatus::parse(raw).ok_or_else(|| ApiError::bad_request("Invalid status"))?)
        }
        None => None,
    };

    if title.is_none() && body.description.is_none() && status.is_none() {
        return Err(ApiError::bad_request("Missing title, description, or status"));
    }

    let patch = ProjectPatch {
        title,
        description: body.description,
        status,
    };

    let project = state.store.update_project(&user, id, patch).await?;
    Ok(Json(json!({ "project": project })))
}
