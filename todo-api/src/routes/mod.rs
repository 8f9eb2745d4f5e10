/// API route handlers
///
/// - `health`: Liveness endpoint
/// - `tasks`: Owner-scoped task CRUD

pub mod health;
pub mod tasks;
