//! Task HTTP Routes
//!
//! | Method | Path                  | Success            |
//! |--------|-----------------------|--------------------|
//! | GET    | /health               | 200                |
//! | GET    | /tasks?search=        | 200, task array    |
//! | POST   | /task                 | 201, created task  |
//! | PUT    | /tasks/:id            | 204                |
//! | DELETE | /tasks/:id            | 204                |
//! | PATCH  | /tasks/:id/complete   | 204                |
//! | POST   | /tasks                | 201, import count  |

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use super::errors::{ApiError, ApiResult};
use crate::csv_import::CsvSource;
use crate::observability::{log_event_with_fields, Event};
use crate::routing::{RouteRequest, RouteResult, Router};
use crate::store::{
    CompletionStatus, Filter, Task, TaskField, TaskPatch, TaskStore, TASKS_TABLE,
};

/// Fields searched by `GET /tasks?search=`
pub const SEARCH_FIELDS: [TaskField; 2] = [TaskField::Title, TaskField::Description];

// ==================
// Shared State
// ==================

/// State shared across task handlers
pub struct TaskState {
    pub store: Arc<TaskStore>,
    pub csv: CsvSource,
}

impl TaskState {
    pub fn new(store: Arc<TaskStore>, csv: CsvSource) -> Self {
        Self { store, csv }
    }
}

pub type SharedTaskState = Arc<TaskState>;

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
}

// ==================
// Task Routes
// ==================

/// Build the task route table
pub fn task_routes() -> RouteResult<Router<SharedTaskState>> {
    Router::new()
        .route(Method::GET, "/health", health)?
        .route(Method::GET, "/tasks", list_tasks)?
        .route(Method::POST, "/task", create_task)?
        .route(Method::PUT, "/tasks/:id", update_task)?
        .route(Method::DELETE, "/tasks/:id", delete_task)?
        .route(Method::PATCH, "/tasks/:id/complete", complete_task)?
        .route(Method::POST, "/tasks", import_tasks)
}

async fn health(_state: SharedTaskState, _req: RouteRequest) -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /tasks - list tasks, optionally searching title OR description
async fn list_tasks(state: SharedTaskState, req: RouteRequest) -> Json<Vec<Task>> {
    let filter = req
        .query_value("search")
        .filter(|s| !s.is_empty())
        .map(|search| Filter::any_of(&SEARCH_FIELDS, search));

    Json(state.store.select(TASKS_TABLE, filter.as_ref()).await)
}

/// POST /task - create a task
async fn create_task(
    state: SharedTaskState,
    req: RouteRequest,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let (title, description) = title_and_description(&req)?;

    let task = state
        .store
        .insert(TASKS_TABLE, Task::new(title, description))
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /tasks/:id - replace title and description
async fn update_task(state: SharedTaskState, req: RouteRequest) -> ApiResult<StatusCode> {
    let id = task_id(&req)?;
    let (title, description) = title_and_description(&req)?;

    state
        .store
        .update(TASKS_TABLE, id, TaskPatch::edit(title, description))
        .await?
        .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /tasks/:id
async fn delete_task(state: SharedTaskState, req: RouteRequest) -> ApiResult<StatusCode> {
    let id = task_id(&req)?;

    state
        .store
        .delete(TASKS_TABLE, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /tasks/:id/complete?completed_at=complete|null
async fn complete_task(state: SharedTaskState, req: RouteRequest) -> ApiResult<StatusCode> {
    let id = task_id(&req)?;
    let status = req
        .query_value("completed_at")
        .and_then(CompletionStatus::from_query)
        .ok_or_else(|| {
            ApiError::Validation(
                "query parameter \"completed_at\" must be \"complete\" or \"null\"".to_string(),
            )
        })?;

    state
        .store
        .set_completion_status(TASKS_TABLE, id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /tasks - bulk import the configured CSV file
async fn import_tasks(
    state: SharedTaskState,
    _req: RouteRequest,
) -> ApiResult<(StatusCode, Json<ImportResponse>)> {
    let imported = import_csv(&state.store, &state.csv).await?;
    Ok((StatusCode::CREATED, Json(ImportResponse { imported })))
}

/// Read every row of `csv` and append them as tasks in one persist.
///
/// Rows without an id or creation time get fresh ones.
pub async fn import_csv(store: &TaskStore, csv: &CsvSource) -> ApiResult<usize> {
    let source = csv.clone();
    let rows = tokio::task::spawn_blocking(move || source.read_all())
        .await
        .map_err(|e| ApiError::Internal(format!("csv reader task failed: {}", e)))??;

    let tasks: Vec<Task> = rows.into_iter().map(|row| row.into_task()).collect();
    let imported = store.insert_many(TASKS_TABLE, tasks).await?;

    log_event_with_fields(
        Event::ImportComplete,
        &[
            ("imported", &imported.to_string()),
            ("path", &csv.path().display().to_string()),
        ],
    );

    Ok(imported)
}

// ==================
// Validation
// ==================

fn task_id(req: &RouteRequest) -> ApiResult<&str> {
    req.param("id")
        .ok_or_else(|| ApiError::Validation("missing task id".to_string()))
}

/// Both fields must be present, strings, and non-empty
fn title_and_description(req: &RouteRequest) -> ApiResult<(String, String)> {
    match (req.body_str("title"), req.body_str("description")) {
        (Some(title), Some(description)) if !title.is_empty() && !description.is_empty() => {
            Ok((title.to_string(), description.to_string()))
        }
        _ => Err(ApiError::Validation(
            "request body must include non-empty \"title\" and \"description\"".to_string(),
        )),
    }
}
