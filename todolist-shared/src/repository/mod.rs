/// Persistence contract for to-do records
///
/// `TodoService` talks to storage only through the [`TodoRepository`] trait.
/// Every read path applies the non-deleted filter; the single explicit
/// bypass is [`TodoRepository::find_by_key_with_deleted`].
///
/// # Backends
///
/// - [`postgres::PgTodoRepository`]: PostgreSQL via sqlx (production)
/// - [`memory::InMemoryTodoRepository`]: process-local store for tests and demos
///
/// # Owner Scoping
///
/// Scoped calls take the owner key as a required argument. `soft_delete` is
/// the exception: it acts on the key alone, so callers must run the scoped
/// lookup first.

use crate::models::todo::{NewTodo, TodoChanges, TodoRecord};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryTodoRepository;
pub use postgres::PgTodoRepository;

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The database rejected or failed the statement
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backing store refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Repository result type alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage operations over `TodoRecord`
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Finds an active record by key, restricted to `owner_key`
    async fn find_by_owner_and_key(
        &self,
        owner_key: i64,
        key: i64,
    ) -> RepositoryResult<Option<TodoRecord>>;

    /// Lists the owner's active records in insertion order
    async fn find_all_by_owner(&self, owner_key: i64) -> RepositoryResult<Vec<TodoRecord>>;

    /// Inserts a record; the store assigns the key and timestamps
    async fn insert(&self, todo: NewTodo) -> RepositoryResult<TodoRecord>;

    /// Writes the present fields of `changes` and refreshes `updated_at`
    ///
    /// Returns `false` when no active record matched.
    async fn update(
        &self,
        owner_key: i64,
        key: i64,
        changes: &TodoChanges,
    ) -> RepositoryResult<bool>;

    /// Stamps `deleted_at` on the record with this key
    ///
    /// Returns `false` when no active record matched.
    async fn soft_delete(&self, key: i64) -> RepositoryResult<bool>;

    /// Finds a record by key whether or not it has been deleted
    async fn find_by_key_with_deleted(&self, key: i64) -> RepositoryResult<Option<TodoRecord>>;

    /// Checks that the store is reachable
    async fn ping(&self) -> RepositoryResult<()>;
}
