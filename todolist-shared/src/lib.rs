//! # Todolist Shared Library
//!
//! This crate contains the domain types, persistence, caching, and business
//! logic used by the to-do list API server.
//!
//! ## Module Organization
//!
//! - `models`: The `TodoRecord` entity and its input/output shapes
//! - `repository`: The `TodoRepository` trait plus PostgreSQL and in-memory backends
//! - `cache`: Redis client and cache invalidation for per-user list views
//! - `service`: `TodoService`, the owner-scoped CRUD operations
//! - `auth`: JWT verification and the request authentication context
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod cache;
pub mod db;
pub mod models;
pub mod repository;
pub mod service;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
