//! Task management API endpoints.

use std::sync::Arc;

use api_protocol::{CreateTaskRequest, ListTasksQuery, SuccessResponse, UpdateTaskRequest};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use entities::Task;
use task_store::{TaskFilter, TaskStore};

use crate::api::body::JsonBody;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Parses a task id taken from the path.
///
/// A non-numeric id is not a validation failure: it is reported like any
/// other failure to run the query.
fn parse_task_id(raw: &str) -> ServerResult<i32> {
    raw.parse()
        .map_err(|_| ServerError::Internal(format!("task id is not an integer: {raw:?}")))
}

fn task_not_found(id: i32) -> ServerError {
    ServerError::NotFound(format!("Task with given id ({id}) was not found"))
}

/// Creates a new task.
pub async fn create_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    JsonBody(request): JsonBody<CreateTaskRequest>,
) -> ServerResult<(StatusCode, Json<SuccessResponse<Task>>)> {
    let new_task = request.validate()?;
    let task = state.store.create_task(new_task).await?;

    tracing::info!(task_id = task.taskid, device_id = task.deviceid, "Task created");

    Ok((StatusCode::CREATED, Json(SuccessResponse::new(task))))
}

/// Lists tasks, optionally only those of one device.
pub async fn list_tasks<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> ServerResult<Json<Vec<Task>>> {
    let Query(query) = query?;
    let mut filter = TaskFilter::default();

    if let Some(device_id) = query.device_id()? {
        // Friendlier than an empty list; the foreign key is what keeps data
        // consistent.
        if !state.store.device_exists(device_id).await? {
            return Err(ServerError::NotFound(format!(
                "Device with given id ({device_id}) was not found"
            )));
        }
        filter = filter.with_device(device_id);
    }

    let tasks = state.store.list_tasks(filter).await?;

    Ok(Json(tasks))
}

/// Gets a task by ID.
pub async fn get_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Task>> {
    let id = parse_task_id(&id)?;

    let task = state
        .store
        .get_task(id)
        .await?
        .ok_or_else(|| task_not_found(id))?;

    Ok(Json(task))
}

/// Updates any of a task's description, priority and mode.
///
/// A body without any of those fields is a no-op answered with 204.
pub async fn update_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateTaskRequest>,
) -> ServerResult<Response> {
    if request.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let update = request.validate()?;
    let id = parse_task_id(&id)?;
    let task = state.store.update_task(id, update).await?;

    tracing::info!(task_id = id, "Task updated");

    Ok(Json(SuccessResponse::new(task)).into_response())
}

/// Deletes a task and returns what was deleted.
pub async fn delete_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<SuccessResponse<Task>>> {
    let id = parse_task_id(&id)?;
    let task = state.store.delete_task(id).await?;

    tracing::info!(task_id = id, "Task deleted");

    Ok(Json(SuccessResponse::new(task)))
}
