use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::store::Store;
use crate::handlers;
use crate::middleware::require_auth;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(project_routes())
        .merge(task_routes())
        .layer(axum::middleware::from_fn(require_auth));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Authenticated API
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn project_routes() -> Router<AppState> {
    use handlers::projects;

    Router::new()
        .route("/projects", get(projects::list).post(projects::create))
        .route("/projects/:id", get(projects::get).patch(projects::update))
}

fn task_routes() -> Router<AppState> {
    use handlers::tasks;

    Router::new()
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route("/tasks/:id", axum::routing::patch(tasks::update).delete(tasks::delete))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Tracker API",
        "version": version,
        "description": "Project and task tracking API",
        "endpoints": {
            "health": "/health (public)",
            "projects": "GET|POST /projects, GET|PATCH /projects/:id (bearer token)",
            "tasks": "GET|POST /tasks?projectId=, PATCH|DELETE /tasks/:id (bearer token)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "error": "database unavailable",
                "database_error": e.to_string()
            })),
        ),
    }
}
