use uuid::Uuid;

use crate::database::models::{Project, Task, TaskStatus};

use super::api::{ClientError, ProjectApi, ProjectDraft, TaskApi, TaskEdit};

/// Per-list-view state machine: `loading -> ready` or `loading -> error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Error(String),
}

/// What the caller should do after an operation. `RedirectToLogin` is the
/// uniform "session expired" handling; everything else is `Done` and the
/// view's own state carries any inline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Done,
    RedirectToLogin,
}

/// Counts by status, computed on demand from the loaded task set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub backlog: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
}

/// Project list view. Mutations issue the remote call and then re-fetch
/// the whole list, so local state always reflects a server-confirmed view.
pub struct ProjectList<A: ProjectApi> {
    api: A,
    state: LoadState,
    projects: Vec<Project>,
    last_error: Option<String>,
}

impl<A: ProjectApi> ProjectList<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: LoadState::Loading,
            projects: Vec::new(),
            last_error: None,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub async fn refresh(&mut self) -> SyncOutcome {
        self.state = LoadState::Loading;
        match self.api.list_projects().await {
            Ok(projects) => {
                self.projects = projects;
                self.state = LoadState::Ready;
                SyncOutcome::Done
            }
            Err(ClientError::SessionExpired) => SyncOutcome::RedirectToLogin,
            Err(e) => {
                self.state = LoadState::Error(e.to_string());
                SyncOutcome::Done
            }
        }
    }

    pub async fn create(&mut self, draft: ProjectDraft) -> SyncOutcome {
        match self.api.create_project(draft).await {
            Ok(_) => {
                self.last_error = None;
                self.refresh().await
            }
            Err(ClientError::SessionExpired) => SyncOutcome::RedirectToLogin,
            Err(e) => {
                self.last_error = Some(e.to_string());
                SyncOutcome::Done
            }
        }
    }
}

/// Task list for one project. Status edits apply optimistically and roll
/// back to the pre-edit snapshot when the remote update fails; successful
/// mutations still end with a full re-fetch so concurrent edits from other
/// sessions are picked up.
///
/// Overlapping edits are not deduplicated or cancelled: if two status
/// updates race, the last response to complete wins in local state.
pub struct TaskBoard<A: TaskApi> {
    api: A,
    project_id: Uuid,
    state: LoadState,
    tasks: Vec<Task>,
    last_error: Option<String>,
}

impl<A: TaskApi> TaskBoard<A> {
    pub fn new(api: A, project_id: Uuid) -> Self {
        Self {
            api,
            project_id,
            state: LoadState::Loading,
            tasks: Vec::new(),
            last_error: None,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for task in &self.tasks {
            match task.status {
                TaskStatus::Backlog => counts.backlog += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Review => counts.review += 1,
                TaskStatus::Done => counts.done += 1,
            }
        }
        counts
    }

    pub async fn refresh(&mut self) -> SyncOutcome {
        self.state = LoadState::Loading;
        match self.api.list_tasks(self.project_id).await {
            Ok(tasks) => {
                self.tasks = tasks;
                self.state = LoadState::Ready;
                SyncOutcome::Done
            }
            Err(ClientError::SessionExpired) => SyncOutcome::RedirectToLogin,
            Err(e) => {
                self.state = LoadState::Error(e.to_string());
                SyncOutcome::Done
            }
        }
    }

    pub async fn add(&mut self, title: &str) -> SyncOutcome {
        match self.api.create_task(self.project_id, title).await {
            Ok(_) => {
                self.last_error = None;
                self.refresh().await
            }
            Err(ClientError::SessionExpired) => SyncOutcome::RedirectToLogin,
            Err(e) => {
                self.last_error = Some(e.to_string());
                SyncOutcome::Done
            }
        }
    }

    /// Optimistic status edit: patch local state first, then confirm
    /// remotely. Failure restores the snapshot taken before the patch.
    pub async fn set_status(&mut self, id: Uuid, status: TaskStatus) -> SyncOutcome {
        let snapshot = self.tasks.clone();
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.status = status;
        }

        let edit = TaskEdit {
            status: Some(status),
            title: None,
        };
        match self.api.update_task(id, edit).await {
            Ok(_) => {
                self.last_error = None;
                self.refresh().await
            }
            Err(ClientError::SessionExpired) => {
                self.tasks = snapshot;
                SyncOutcome::RedirectToLogin
            }
            Err(e) => {
                self.tasks = snapshot;
                self.last_error = Some(e.to_string());
                SyncOutcome::Done
            }
        }
    }

    pub async fn rename(&mut self, id: Uuid, title: &str) -> SyncOutcome {
        let edit = TaskEdit {
            status: None,
            title: Some(title.to_string()),
        };
        match self.api.update_task(id, edit).await {
            Ok(_) => {
                self.last_error = None;
                self.refresh().await
            }
            Err(ClientError::SessionExpired) => SyncOutcome::RedirectToLogin,
            Err(e) => {
                self.last_error = Some(e.to_string());
                SyncOutcome::Done
            }
        }
    }

    pub async fn remove(&mut self, id: Uuid) -> SyncOutcome {
        match self.api.delete_task(id).await {
            Ok(_) => {
                self.last_error = None;
                self.refresh().await
            }
            Err(ClientError::SessionExpired) => SyncOutcome::RedirectToLogin,
            Err(e) => {
                self.last_error = Some(e.to_string());
                SyncOutcome::Done
            }
        }
    }
}
