/// Task endpoints
///
/// Every route is mounted under `/api/:user_id/tasks` behind the JWT layer.
/// The `user_id` segment must equal the token subject (403 otherwise), and
/// all lookups are scoped to that owner, so another user's task answers 404.
///
/// # Endpoints
///
/// - `POST   /api/:user_id/tasks` - Create task
/// - `GET    /api/:user_id/tasks` - List tasks (newest first)
/// - `GET    /api/:user_id/tasks/:task_id` - Get task
/// - `PUT    /api/:user_id/tasks/:task_id` - Partially update task
/// - `DELETE /api/:user_id/tasks/:task_id` - Delete task
/// - `PATCH  /api/:user_id/tasks/:task_id/complete` - Toggle completion

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{OwnerScope, TaskPath, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use todo_shared::models::task::{
    CreateTask, Task, TaskChanges, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN,
};
use validator::{Validate, ValidationError, ValidationErrors};

/// Create task request
///
/// A `user_id` in the body is ignored; the owner is always the token subject.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "reject_nul")
    )]
    pub title: String,

    /// Optional description
    #[validate(
        length(max = 1000, message = "Description must be at most 1000 characters"),
        custom(function = "reject_nul")
    )]
    pub description: Option<String>,
}

/// Update task request
///
/// Absent fields are left untouched. `"description": null` clears the
/// description; `null` for `title` or `completed` counts as absent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,

    /// New description, `Some(None)` when explicitly null
    #[serde(default, deserialize_with = "present_or_null")]
    pub description: Option<Option<String>>,

    /// New completion flag
    pub completed: Option<bool>,
}

/// Distinguishes an explicit `null` from a missing field
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn length_error(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("length");
    error.message = Some(Cow::Borrowed(message));
    error
}

/// PostgreSQL text columns cannot store NUL
fn reject_nul(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        let mut error = ValidationError::new("nul_character");
        error.message = Some(Cow::Borrowed("Must not contain NUL characters"));
        return Err(error);
    }
    Ok(())
}

impl Validate for UpdateTaskRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(title) = &self.title {
            let len = title.chars().count() as u64;
            if len == 0 || len > TITLE_MAX_LEN {
                errors.add("title", length_error("Title must be 1-200 characters"));
            }
            if let Err(error) = reject_nul(title) {
                errors.add("title", error);
            }
        }

        if let Some(Some(description)) = &self.description {
            if description.chars().count() as u64 > DESCRIPTION_MAX_LEN {
                errors.add(
                    "description",
                    length_error("Description must be at most 1000 characters"),
                );
            }
            if let Err(error) = reject_nul(description) {
                errors.add("description", error);
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl UpdateTaskRequest {
    /// Converts the request into model-level changes
    pub fn into_changes(self) -> TaskChanges {
        TaskChanges {
            title: self.title,
            description: self.description,
            completed: self.completed,
        }
    }
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /api/:user_id/tasks
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "title": "Buy milk", "description": "2 litres" }
/// ```
///
/// # Response
///
/// `201 Created` with the full task.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON or field validation failed
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: `user_id` is not the token subject
pub async fn create_task(
    State(state): State<AppState>,
    OwnerScope(user_id): OwnerScope,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: user_id.into_inner(),
            title: req.title,
            description: req.description,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, user_id = %task.user_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// List the caller's tasks, newest first
pub async fn list_tasks(
    State(state): State<AppState>,
    OwnerScope(user_id): OwnerScope,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_user(&state.db, user_id.as_str()).await?;

    tracing::debug!(user_id = %user_id, count = tasks.len(), "Listed tasks");

    Ok(Json(tasks))
}

/// Get a single task
///
/// # Errors
///
/// - `404 Not Found`: No such task for this owner
pub async fn get_task(
    State(state): State<AppState>,
    OwnerScope(user_id): OwnerScope,
    TaskPath(task_id): TaskPath,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id_and_user(&state.db, task_id, user_id.as_str())
        .await?
        .ok_or_else(ApiError::task_not_found)?;

    Ok(Json(task))
}

/// Partially update a task
///
/// # Endpoint
///
/// ```text
/// PUT /api/:user_id/tasks/:task_id
///
/// { "title": "Buy oat milk", "description": null }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Field validation failed
/// - `404 Not Found`: No such task for this owner
pub async fn update_task(
    State(state): State<AppState>,
    OwnerScope(user_id): OwnerScope,
    TaskPath(task_id): TaskPath,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let changes = req.into_changes();
    if changes.is_empty() {
        tracing::debug!(task_id = %task_id, "Empty update, refreshing updated_at only");
    }

    let task = Task::update(&state.db, task_id, user_id.as_str(), changes)
        .await?
        .ok_or_else(ApiError::task_not_found)?;

    tracing::info!(task_id = %task.id, user_id = %user_id, "Task updated");

    Ok(Json(task))
}

/// Delete a task
///
/// Returns `204 No Content`.
/// Foreign and missing tasks both answer 404.
pub async fn delete_task(
    State(state): State<AppState>,
    OwnerScope(user_id): OwnerScope,
    TaskPath(task_id): TaskPath,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete(&state.db, task_id, user_id.as_str()).await?;
    if !deleted {
        return Err(ApiError::task_not_found());
    }

    tracing::info!(task_id = %task_id, user_id = %user_id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Toggle the completion flag
pub async fn toggle_complete(
    State(state): State<AppState>,
    OwnerScope(user_id): OwnerScope,
    TaskPath(task_id): TaskPath,
) -> ApiResult<Json<Task>> {
    let task = Task::toggle_completed(&state.db, task_id, user_id.as_str())
        .await?
        .ok_or_else(ApiError::task_not_found)?;

    tracing::info!(
        task_id = %task.id,
        user_id = %user_id,
        completed = task.completed,
        "Task completion toggled"
    );

    Ok(Json(task))
}
