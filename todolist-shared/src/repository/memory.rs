/// In-memory to-do repository
///
/// Process-local backend with the same contract as the PostgreSQL one:
/// sequential keys starting at 1, insertion-ordered listing, soft deletes
/// that keep the row. Useful for:
/// - Testing the service and HTTP layers without a database
/// - Local demos
///
/// Writes can be made to fail on demand to exercise persistence error paths.
///
/// # Example
///
/// ```
/// use todolist_shared::models::todo::NewTodo;
/// use todolist_shared::repository::{InMemoryTodoRepository, TodoRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = InMemoryTodoRepository::new();
/// let todo = repo.insert(NewTodo {
///     owner_key: 1,
///     title: "Example Title".to_string(),
///     content: "Example Content".to_string(),
/// }).await?;
/// assert_eq!(todo.key, 1);
/// # Ok(())
/// # }
/// ```

use super::{RepositoryError, RepositoryResult, TodoRepository};
use crate::models::todo::{NewTodo, TodoChanges, TodoRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Rows {
    records: Vec<TodoRecord>,
    last_key: i64,
}

/// To-do repository held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    rows: Arc<RwLock<Rows>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent insert/update/soft delete fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored rows, deleted ones included
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.records.len()
    }

    fn check_writable(&self) -> RepositoryResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("writes are disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn find_by_owner_and_key(
        &self,
        owner_key: i64,
        key: i64,
    ) -> RepositoryResult<Option<TodoRecord>> {
        let rows = self.rows.read().await;
        Ok(rows
            .records
            .iter()
            .find(|t| t.key == key && t.is_owned_by(owner_key) && t.state().is_active())
            .cloned())
    }

    async fn find_all_by_owner(&self, owner_key: i64) -> RepositoryResult<Vec<TodoRecord>> {
        let rows = self.rows.read().await;
        Ok(rows
            .records
            .iter()
            .filter(|t| t.is_owned_by(owner_key) && t.state().is_active())
            .cloned()
            .collect())
    }

    async fn insert(&self, todo: NewTodo) -> RepositoryResult<TodoRecord> {
        self.check_writable()?;

        let mut rows = self.rows.write().await;
        rows.last_key += 1;

        let now = Utc::now();
        let record = TodoRecord {
            key: rows.last_key,
            title: todo.title,
            content: todo.content,
            owner_key: todo.owner_key,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.records.push(record.clone());

        Ok(record)
    }

    async fn update(
        &self,
        owner_key: i64,
        key: i64,
        changes: &TodoChanges,
    ) -> RepositoryResult<bool> {
        self.check_writable()?;

        let mut rows = self.rows.write().await;
        match rows
            .records
            .iter_mut()
            .find(|t| t.key == key && t.is_owned_by(owner_key) && t.state().is_active())
        {
            Some(record) => {
                record.apply(changes);
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, key: i64) -> RepositoryResult<bool> {
        self.check_writable()?;

        let mut rows = self.rows.write().await;
        match rows
            .records
            .iter_mut()
            .find(|t| t.key == key && t.state().is_active())
        {
            Some(record) => {
                record.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_key_with_deleted(&self, key: i64) -> RepositoryResult<Option<TodoRecord>> {
        let rows = self.rows.read().await;
        Ok(rows.records.iter().find(|t| t.key == key).cloned())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
