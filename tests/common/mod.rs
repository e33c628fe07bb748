#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use tracker_api::auth::{mint_token, AuthUser, Claims, ACCESS_ADMIN, ACCESS_USER};
use tracker_api::database::models::{Project, Task, TaskStatus};
use tracker_api::database::store::{NewProject, ProjectPatch, Store, StoreError, TaskPatch};
use tracker_api::server::{app, AppState};

/// In-memory store mirroring the Postgres store's observable behavior:
/// ownership scoping, newest-first ordering, idempotent task delete.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    projects: Vec<Project>,
    tasks: Vec<Task>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn can_see(project: &Project, viewer: &AuthUser) -> bool {
        project.user_id == viewer.user_id || viewer.is_admin()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_projects(&self, viewer: &AuthUser) -> Result<Vec<Project>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .projects
            .iter()
            .rev()
            .filter(|p| Self::can_see(p, viewer))
            .cloned()
            .collect())
    }

    async fn get_project(&self, viewer: &AuthUser, id: Uuid) -> Result<Project, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .projects
            .iter()
            .find(|p| p.id == id && Self::can_see(p, viewer))
            .cloned()
            .ok_or_else(|| StoreError::NotFound("Project not found".to_string()))
    }

    async fn create_project(&self, viewer: &AuthUser, new: NewProject) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let project = Project {
            id: Uuid::new_v4(),
            user_id: viewer.user_id,
            title: new.title,
            description: new.description,
            status: new.status,
            created_at: Utc::now(),
        };
        let id = project.id;
        inner.projects.push(project);
        Ok(id)
    }

    async fn update_project(
        &self,
        viewer: &AuthUser,
        id: Uuid,
        patch: ProjectPatch,
    ) -> Result<Project, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let project = inner
            .projects
            .iter_mut()
            .find(|p| p.id == id && Self::can_see(p, viewer))
            .ok_or_else(|| StoreError::NotFound("Project not found".to_string()))?;

        if let Some(title) = patch.title {
            project.title = title;
        }
        if let Some(description) = patch.description {
            project.description = Some(description);
        }
        if let Some(status) = patch.status {
            project.status = status;
        }
        Ok(project.clone())
    }

    async fn list_tasks(&self, viewer: &AuthUser, project_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let visible = inner
            .projects
            .iter()
            .any(|p| p.id == project_id && Self::can_see(p, viewer));
        if !visible {
            return Ok(vec![]);
        }
        Ok(inner
            .tasks
            .iter()
            .rev()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_task(
        &self,
        viewer: &AuthUser,
        project_id: Uuid,
        title: String,
    ) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let visible = inner
            .projects
            .iter()
            .any(|p| p.id == project_id && Self::can_see(p, viewer));
        if !visible {
            return Err(StoreError::NotFound("Project not found".to_string()));
        }

        let task = Task {
            id: Uuid::new_v4(),
            project_id,
            title,
            status: TaskStatus::Backlog,
            created_at: Utc::now(),
        };
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        viewer: &AuthUser,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Inner { projects, tasks } = &mut *inner;
        let task = tasks
            .iter_mut()
            .find(|t| {
                t.id == id
                    && projects
                        .iter()
                        .any(|p| p.id == t.project_id && Self::can_see(p, viewer))
            })
            .ok_or_else(|| StoreError::NotFound("Task not found".to_string()))?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, viewer: &AuthUser, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Inner { projects, tasks } = &mut *inner;
        tasks.retain(|t| {
            !(t.id == id
                && projects
                    .iter()
                    .any(|p| p.id == t.project_id && Self::can_see(p, viewer)))
        });
        Ok(())
    }
}

pub fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = MemoryStore::new();
    let router = app(AppState::new(store.clone()));
    (router, store)
}

pub fn user_token(user_id: Uuid, email: &str) -> String {
    let claims = Claims::new(user_id, email.to_string(), ACCESS_USER.to_string());
    mint_token(&claims).expect("mint token")
}

pub fn admin_token(user_id: Uuid) -> String {
    let claims = Claims::new(user_id, "admin@example.com".to_string(), ACCESS_ADMIN.to_string());
    mint_token(&claims).expect("mint token")
}

/// Fire one request at the router and decode the JSON body (Null for
/// empty bodies such as 204 responses).
pub async fn send(
    router: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };

    (status, value)
}
