/// Task model and database operations
///
/// A task belongs to exactly one user (the token subject that created it).
/// Every query that reads or mutates a single task filters on both `id` and
/// `user_id`, so a task owned by someone else is indistinguishable from one
/// that does not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     user_id TEXT NOT NULL,
///     title VARCHAR(200) NOT NULL,
///     description VARCHAR(1000),
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE INDEX idx_tasks_user_id ON tasks (user_id);
/// ```
///
/// # Example
///
/// ```no_run
/// use todo_shared::models::task::{CreateTask, Task, TaskChanges};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     user_id: "user-123".to_string(),
///     title: "Buy milk".to_string(),
///     description: None,
/// }).await?;
///
/// Task::toggle_completed(&pool, task.id, "user-123").await?;
///
/// let changes = TaskChanges {
///     title: Some("Buy oat milk".to_string()),
///     ..Default::default()
/// };
/// Task::update(&pool, task.id, "user-123", changes).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Maximum title length, in characters
pub const TITLE_MAX_LEN: u64 = 200;

/// Maximum description length, in characters
pub const DESCRIPTION_MAX_LEN: u64 = 1000;

/// Task model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (generated server-side)
    pub id: Uuid,

    /// Owner - the token subject that created the task
    pub user_id: String,

    /// Title (1-200 characters)
    pub title: String,

    /// Optional description (up to 1000 characters)
    pub description: Option<String>,

    /// Completion flag
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last mutated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// Lengths are validated at the HTTP boundary; the table constraints are the
/// last line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owner (always the verified subject)
    pub user_id: String,

    /// Title
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Partial update of a task
///
/// `None` leaves a field untouched. For `description`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// New title
    pub title: Option<String>,

    /// New description (or `Some(None)` to clear)
    pub description: Option<Option<String>>,

    /// New completion flag
    pub completed: Option<bool>,
}

impl TaskChanges {
    /// True when no field would change (only `updated_at` is refreshed)
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Builds the UPDATE statement for these changes
    ///
    /// `$1` is the task ID, `$2` the owner, `$3` the new `updated_at`; the
    /// changed columns follow in field order.
    fn update_query(&self) -> String {
        let mut query = String::from("UPDATE tasks SET updated_at = $3");
        let mut bind_count = 3;

        if self.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if self.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if self.completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", completed = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, title, description, completed, created_at, updated_at",
        );
        query
    }
}

impl Task {
    /// Creates a new task
    ///
    /// Assigns a fresh ID, `completed = false` and sets both timestamps to
    /// the same instant.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, user_id, title, description, completed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, FALSE, $5, $5)
            RETURNING id, user_id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks of a user, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a task by ID with owner isolation
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Applies a partial update and refreshes `updated_at`
    ///
    /// Returns `None` if the task does not exist for this owner.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
        changes: TaskChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = changes.update_query();

        let mut q = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .bind(Utc::now());

        if let Some(title) = changes.title {
            q = q.bind(title);
        }
        if let Some(description) = changes.description {
            q = q.bind(description);
        }
        if let Some(completed) = changes.completed {
            q = q.bind(completed);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Flips the completion flag and refreshes `updated_at`
    ///
    /// Returns `None` if the task does not exist for this owner.
    pub async fn toggle_completed(
        pool: &PgPool,
        id: Uuid,
        user_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET completed = NOT completed,
                updated_at = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// Returns `false` if the task does not exist for this owner.
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
