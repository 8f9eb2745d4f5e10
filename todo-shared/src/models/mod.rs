/// Database models
///
/// - `task`: The single owned entity, with owner-scoped CRUD queries
///
/// # Example
///
/// ```no_run
/// use todo_shared::models::task::Task;
/// use todo_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// }).await?;
///
/// let tasks = Task::list_by_user(&pool, "user-123").await?;
/// println!("{} tasks", tasks.len());
/// # Ok(())
/// # }
/// ```

pub mod task;
