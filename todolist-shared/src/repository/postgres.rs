/// PostgreSQL-backed to-do repository
///
/// # Example
///
/// ```no_run
/// use todolist_shared::db::pool::{create_pool, DatabaseConfig};
/// use todolist_shared::models::todo::NewTodo;
/// use todolist_shared::repository::{PgTodoRepository, TodoRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&DatabaseConfig::from_env()?).await?;
/// let repo = PgTodoRepository::new(pool);
///
/// let todo = repo.insert(NewTodo {
///     owner_key: 1,
///     title: "Example Title".to_string(),
///     content: "Example Content".to_string(),
/// }).await?;
///
/// let mine = repo.find_all_by_owner(1).await?;
/// assert!(mine.iter().any(|t| t.key == todo.key));
/// # Ok(())
/// # }
/// ```

use super::{RepositoryResult, TodoRepository};
use crate::db::pool::health_check;
use crate::models::todo::{NewTodo, TodoChanges, TodoRecord};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

const COLUMNS: &str = "key, title, content, owner_key, created_at, updated_at, deleted_at";

/// To-do repository over a sqlx connection pool
#[derive(Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn find_by_owner_and_key(
        &self,
        owner_key: i64,
        key: i64,
    ) -> RepositoryResult<Option<TodoRecord>> {
        let query = format!(
            "SELECT {COLUMNS} FROM todo_lists \
             WHERE key = $1 AND owner_key = $2 AND deleted_at IS NULL"
        );

        let todo = sqlx::query_as::<_, TodoRecord>(&query)
            .bind(key)
            .bind(owner_key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(todo)
    }

    async fn find_all_by_owner(&self, owner_key: i64) -> RepositoryResult<Vec<TodoRecord>> {
        let query = format!(
            "SELECT {COLUMNS} FROM todo_lists \
             WHERE owner_key = $1 AND deleted_at IS NULL \
             ORDER BY key ASC"
        );

        let todos = sqlx::query_as::<_, TodoRecord>(&query)
            .bind(owner_key)
            .fetch_all(&self.pool)
            .await?;

        Ok(todos)
    }

    async fn insert(&self, todo: NewTodo) -> RepositoryResult<TodoRecord> {
        let query = format!(
            "INSERT INTO todo_lists (title, content, owner_key) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );

        let record = sqlx::query_as::<_, TodoRecord>(&query)
            .bind(todo.title)
            .bind(todo.content)
            .bind(todo.owner_key)
            .fetch_one(&self.pool)
            .await?;

        debug!(key = record.key, owner_key = record.owner_key, "Inserted todo");
        Ok(record)
    }

    async fn update(
        &self,
        owner_key: i64,
        key: i64,
        changes: &TodoChanges,
    ) -> RepositoryResult<bool> {
        let mut query = String::from("UPDATE todo_lists SET updated_at = NOW()");
        let mut bind_count = 2;

        if changes.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if changes.content.is_some() {
            bind_count += 1;
            query.push_str(&format!(", content = ${}", bind_count));
        }

        query.push_str(" WHERE key = $1 AND owner_key = $2 AND deleted_at IS NULL");

        let mut q = sqlx::query(&query).bind(key).bind(owner_key);

        if let Some(title) = &changes.title {
            q = q.bind(title);
        }
        if let Some(content) = &changes.content {
            q = q.bind(content);
        }

        let result = q.execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, key: i64) -> RepositoryResult<bool> {
        let result = sqlx::query(
            "UPDATE todo_lists SET deleted_at = NOW() WHERE key = $1 AND deleted_at IS NULL",
        )
        .bind(key)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_key_with_deleted(&self, key: i64) -> RepositoryResult<Option<TodoRecord>> {
        let query = format!("SELECT {COLUMNS} FROM todo_lists WHERE key = $1");

        let todo = sqlx::query_as::<_, TodoRecord>(&query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(todo)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }
}
