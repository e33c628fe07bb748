use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::database::models::{Project, ProjectStatus, Task, TaskStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Data access seam. Every operation is a single statement, and every
/// statement carries the ownership predicate explicitly:
/// `user_id = viewer OR viewer is admin`. A row that exists but belongs
/// to someone else is indistinguishable from a missing row, which is the
/// same observable behavior a row-level policy produces.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health(&self) -> Result<(), StoreError>;

    async fn list_projects(&self, viewer: &AuthUser) -> Result<Vec<Project>, StoreError>;
    async fn get_project(&self, viewer: &AuthUser, id: Uuid) -> Result<Project, StoreError>;
    async fn create_project(&self, viewer: &AuthUser, new: NewProject) -> Result<Uuid, StoreError>;
    async fn update_project(
        &self,
        viewer: &AuthUser,
        id: Uuid,
        patch: ProjectPatch,
    ) -> Result<Project, StoreError>;

    async fn list_tasks(&self, viewer: &AuthUser, project_id: Uuid) -> Result<Vec<Task>, StoreError>;
    async fn create_task(
        &self,
        viewer: &AuthUser,
        project_id: Uuid,
        title: String,
    ) -> Result<Task, StoreError>;
    async fn update_task(
        &self,
        viewer: &AuthUser,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, StoreError>;
    async fn delete_task(&self, viewer: &AuthUser, id: Uuid) -> Result<(), StoreError>;
}

/// Postgres-backed store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_projects(&self, viewer: &AuthUser) -> Result<Vec<Project>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, user_id, title, description, status, created_at \
             FROM projects \
             WHERE user_id = $1 OR $2 \
             ORDER BY created_at DESC",
        )
        .bind(viewer.user_id)
        .bind(viewer.is_admin())
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn get_project(&self, viewer: &AuthUser, id: Uuid) -> Result<Project, StoreError> {
        sqlx::query_as::<_, Project>(
            "SELECT id, user_id, title, description, status, created_at \
             FROM projects \
             WHERE id = $1 AND (user_id = $2 OR $3)",
        )
        .bind(id)
        .bind(viewer.user_id)
        .bind(viewer.is_admin())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("Project not found".to_string()))
    }

    async fn create_project(&self, viewer: &AuthUser, new: NewProject) -> Result<Uuid, StoreError> {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO projects (user_id, title, description, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(viewer.user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_project(
        &self,
        viewer: &AuthUser,
        id: Uuid,
        patch: ProjectPatch,
    ) -> Result<Project, StoreError> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects \
             SET title = COALESCE($1, title), \
                 description = COALESCE($2, description), \
                 status = COALESCE($3, status) \
             WHERE id = $4 AND (user_id = $5 OR $6) \
             RETURNING id, user_id, title, description, status, created_at",
        )
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.status)
        .bind(id)
        .bind(viewer.user_id)
        .bind(viewer.is_admin())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("Project not found".to_string()))
    }

    async fn list_tasks(&self, viewer: &AuthUser, project_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT t.id, t.project_id, t.title, t.status, t.created_at \
             FROM tasks t \
             JOIN projects p ON p.id = t.project_id \
             WHERE t.project_id = $1 AND (p.user_id = $2 OR $3) \
             ORDER BY t.created_at DESC",
        )
        .bind(project_id)
        .bind(viewer.user_id)
        .bind(viewer.is_admin())
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn create_task(
        &self,
        viewer: &AuthUser,
        project_id: Uuid,
        title: String,
    ) -> Result<Task, StoreError> {
        // INSERT ... SELECT checks project visibility and inserts in one
        // statement; status is forced to backlog here, never client-supplied.
        // RETURNING hands back the inserted row, so no second query.
        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (project_id, title, status) \
             SELECT p.id, $2, 'backlog'::task_status \
             FROM projects p \
             WHERE p.id = $1 AND (p.user_id = $3 OR $4) \
             RETURNING id, project_id, title, status, created_at",
        )
        .bind(project_id)
        .bind(&title)
        .bind(viewer.user_id)
        .bind(viewer.is_admin())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("Project not found".to_string()))
    }

    async fn update_task(
        &self,
        viewer: &AuthUser,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, StoreError> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks t \
             SET title = COALESCE($1, t.title), \
                 status = COALESCE($2, t.status) \
             FROM projects p \
             WHERE t.id = $3 AND p.id = t.project_id AND (p.user_id = $4 OR $5) \
             RETURNING t.id, t.project_id, t.title, t.status, t.created_at",
        )
        .bind(&patch.title)
        .bind(patch.status)
        .bind(id)
        .bind(viewer.user_id)
        .bind(viewer.is_admin())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("Task not found".to_string()))
    }

    async fn delete_task(&self, viewer: &AuthUser, id: Uuid) -> Result<(), StoreError> {
        // Zero rows affected is still success: delete is idempotent.
        sqlx::query(
            "DELETE FROM tasks t \
             USING projects p \
             WHERE t.id = $1 AND p.id = t.project_id AND (p.user_id = $2 OR $3)",
        )
        .bind(id)
        .bind(viewer.user_id)
        .bind(viewer.is_admin())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
