//! # Todo Shared Library
//!
//! Types and logic shared by the Todo API binaries and their tests.
//!
//! ## Module Organization
//!
//! - `auth`: Bearer token verification and ownership checks
//! - `db`: Connection pool and schema migrations
//! - `models`: The `Task` model and its owner-scoped queries

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
