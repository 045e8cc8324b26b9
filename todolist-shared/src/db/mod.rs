/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: Schema migrations embedded from `migrations/`
///
/// Queries against `todo_lists` live in `repository::postgres`.

pub mod migrations;
pub mod pool;
