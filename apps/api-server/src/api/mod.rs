//! API endpoints.

pub mod body;
pub mod task;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use task_store::TaskStore;

use crate::state::AppState;

/// Creates the API router with all endpoints. Mounted under `/api`.
pub fn create_router<S: TaskStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/tasks", post(task::create_task).get(task::list_tasks))
        .route(
            "/tasks/:id",
            get(task::get_task)
                .put(task::update_task)
                .delete(task::delete_task),
        )
}

/// Health check endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}
