use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Project, ProjectStatus, Task, TaskStatus};

use super::session::SessionSource;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable session: either no token was available locally, or the
    /// server answered 401. Views map this to a redirect to login.
    #[error("session expired")]
    SessionExpired,

    /// The server rejected the request; carries the `{error}` message.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Fields of a project create/update, shared by client call sites.
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

/// Partial task edit; at least one field should be set.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub status: Option<TaskStatus>,
    pub title: Option<String>,
}

/// Project operations as seen by view code. `ApiClient` is the real
/// implementation; tests substitute an in-memory fake.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError>;
    async fn get_project(&self, id: Uuid) -> Result<Project, ClientError>;
    async fn create_project(&self, draft: ProjectDraft) -> Result<Uuid, ClientError>;
    async fn update_project(&self, id: Uuid, draft: ProjectDraft) -> Result<Project, ClientError>;
}

#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, ClientError>;
    async fn create_task(&self, project_id: Uuid, title: &str) -> Result<Task, ClientError>;
    async fn update_task(&self, id: Uuid, edit: TaskEdit) -> Result<Task, ClientError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
struct ProjectsBody {
    projects: Vec<Project>,
}

#[derive(Deserialize)]
struct ProjectBody {
    project: Project,
}

#[derive(Deserialize)]
struct CreatedBody {
    id: Uuid,
}

#[derive(Deserialize)]
struct TasksBody {
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct TaskBody {
    task: Task,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the tracker API. All session handling lives here:
/// the token comes from the `SessionSource` per call, and every response
/// passes through one 401 check instead of per-call-site handling.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionSource>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Current token, or SessionExpired when none is available.
    fn token(&self) -> Result<String, ClientError> {
        self.session.access_token().ok_or(ClientError::SessionExpired)
    }

    /// The single response interceptor: 401 means the session is gone;
    /// any other failure surfaces the server's `{error}` message.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::SessionExpired);
        }
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("request failed with status {}", status));

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_checked(&self, path: &str) -> Result<reqwest::Response, ClientError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(self.token()?)
            .send()
            .await?;
        Self::check(response).await
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, ClientError> {
        let response = self
            .http
            .request(method, self.url(path))
            .bearer_auth(self.token()?)
            .json(body)
            .send()
            .await?;
        Self::check(response).await
    }
}

#[async_trait]
impl ProjectApi for ApiClient {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let body: ProjectsBody = self.get_checked("/projects").await?.json().await?;
        Ok(body.projects)
    }

    async fn get_project(&self, id: Uuid) -> Result<Project, ClientError> {
        let path = format!("/projects/{}", id);
        let body: ProjectBody = self.get_checked(&path).await?.json().await?;
        Ok(body.project)
    }

    async fn create_project(&self, draft: ProjectDraft) -> Result<Uuid, ClientError> {
        let payload = json!({
            "title": draft.title,
            "description": draft.description,
            "status": draft.status,
        });
        let body: CreatedBody = self
            .send_json(reqwest::Method::POST, "/projects", &payload)
            .await?
            .json()
            .await?;
        Ok(body.id)
    }

    async fn update_project(&self, id: Uuid, draft: ProjectDraft) -> Result<Project, ClientError> {
        let path = format!("/projects/{}", id);
        let payload = json!({
            "title": draft.title,
            "description": draft.description,
            "status": draft.status,
        });
        let body: ProjectBody = self
            .send_json(reqwest::Method::PATCH, &path, &payload)
            .await?
            .json()
            .await?;
        Ok(body.project)
    }
}

#[async_trait]
impl TaskApi for ApiClient {
    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, ClientError> {
        let path = format!("/tasks?projectId={}", project_id);
        let body: TasksBody = self.get_checked(&path).await?.json().await?;
        Ok(body.tasks)
    }

    async fn create_task(&self, project_id: Uuid, title: &str) -> Result<Task, ClientError> {
        let path = format!("/tasks?projectId={}", project_id);
        let payload = json!({ "title": title });
        let body: TaskBody = self
            .send_json(reqwest::Method::POST, &path, &payload)
            .await?
            .json()
            .await?;
        Ok(body.task)
    }

    async fn update_task(&self, id: Uuid, edit: TaskEdit) -> Result<Task, ClientError> {
        let path = format!("/tasks/{}", id);
        let payload = json!({
            "status": edit.status,
            "title": edit.title,
        });
        let body: TaskBody = self
            .send_json(reqwest::Method::PATCH, &path, &payload)
            .await?
            .json()
            .await?;
        Ok(body.task)
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), ClientError> {
        let path = format!("/tasks/{}", id);
        let response = self
            .http
            .delete(self.url(&path))
            .bearer_auth(self.token()?)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
