/// Owner-scoped to-do operations
///
/// `TodoService` is the only entry point the HTTP layer uses. It validates
/// input, scopes every lookup to the caller, maps records to response shapes,
/// and drops the caller's cached list view after each confirmed write.
///
/// # Operations
///
/// | Operation | Reads | Writes | Invalidates |
/// |---|---|---|---|
/// | `list` | owner's active rows | – | no |
/// | `get` | one active row | – | no |
/// | `create` | – | insert | yes |
/// | `update` | one active row | present fields | yes |
/// | `delete` | one active row | `deleted_at` by key | yes |
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use todolist_shared::cache::RecordingCacheInvalidator;
/// use todolist_shared::models::todo::CreateTodoInput;
/// use todolist_shared::repository::InMemoryTodoRepository;
/// use todolist_shared::service::TodoService;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = TodoService::new(
///     Arc::new(InMemoryTodoRepository::new()),
///     Arc::new(RecordingCacheInvalidator::new()),
/// );
///
/// service.create(1, CreateTodoInput {
///     title: Some("Example Title".to_string()),
///     content: Some("Example Content".to_string()),
/// }).await?;
///
/// let todos = service.list(1).await?;
/// assert_eq!(todos[0].key, "1");
/// # Ok(())
/// # }
/// ```

use crate::cache::CacheInvalidator;
use crate::models::todo::{CreateTodoInput, CreatedTodo, NewTodo, TodoChanges, TodoRecord, TodoView};
use crate::repository::{RepositoryError, TodoRepository};
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

/// Errors returned by `TodoService`
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// Required input is missing or empty
    #[error("{0}")]
    InvalidArgument(String),

    /// No active record with that key belongs to the caller
    #[error("{0}")]
    NotFound(String),

    /// The store failed the operation
    #[error("{operation} failed")]
    Persistence {
        operation: &'static str,
        #[source]
        source: Option<RepositoryError>,
    },
}

impl TodoError {
    fn persistence(operation: &'static str, source: RepositoryError) -> Self {
        TodoError::Persistence {
            operation,
            source: Some(source),
        }
    }
}

/// Service result type alias
pub type TodoResult<T> = Result<T, TodoError>;

/// Reachability of the backends behind `TodoService`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendHealth {
    pub database: bool,
    pub cache: bool,
}

/// Per-user to-do CRUD over a repository and a cache invalidator
#[derive(Clone)]
pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
    cache: Arc<dyn CacheInvalidator>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>, cache: Arc<dyn CacheInvalidator>) -> Self {
        Self { repo, cache }
    }

    /// Pings the repository and the cache concurrently
    pub async fn health(&self) -> BackendHealth {
        let (database, cache) = tokio::join!(self.repo.ping(), self.cache.ping());

        if let Err(e) = &cache {
            warn!(error = %e, "Cache health check failed");
        }

        BackendHealth {
            database: database.is_ok(),
            cache: cache.is_ok(),
        }
    }

    /// Lists the caller's active notes in insertion order
    pub async fn list(&self, caller: i64) -> TodoResult<Vec<TodoView>> {
        let todos = self
            .repo
            .find_all_by_owner(caller)
            .await
            .map_err(|e| TodoError::persistence("list", e))?;

        Ok(todos.into_iter().map(TodoView::from).collect())
    }

    /// Fetches one of the caller's notes
    pub async fn get(&self, caller: i64, key: Option<i64>) -> TodoResult<TodoView> {
        let key = require_key(key)?;
        let todo = self.find_owned(caller, key, "lookup").await?;

        Ok(TodoView::from(todo))
    }

    /// Creates a note owned by the caller
    ///
    /// The response echoes title and content but not the assigned key.
    pub async fn create(&self, caller: i64, input: CreateTodoInput) -> TodoResult<CreatedTodo> {
        input.validate().map_err(|e| {
            let mut messages: Vec<String> = e
                .field_errors()
                .iter()
                .flat_map(|(_, errors)| {
                    errors
                        .iter()
                        .filter_map(|error| error.message.as_ref().map(|m| m.to_string()))
                })
                .collect();
            messages.sort();
            TodoError::InvalidArgument(messages.join(", "))
        })?;

        // Both fields are present after validation
        let (title, content) = match (input.title, input.content) {
            (Some(title), Some(content)) => (title, content),
            _ => {
                return Err(TodoError::InvalidArgument(
                    "title and content are required".to_string(),
                ))
            }
        };

        let record = self
            .repo
            .insert(NewTodo {
                owner_key: caller,
                title,
                content,
            })
            .await
            .map_err(|e| TodoError::persistence("create", e))?;

        info!(owner_key = caller, key = record.key, "Todo created");
        self.invalidate(caller).await;

        Ok(CreatedTodo {
            title: record.title,
            content: record.content,
        })
    }

    /// Applies a partial update to one of the caller's notes
    ///
    /// Without any field present the store is left untouched; the call still
    /// succeeds.
    pub async fn update(
        &self,
        caller: i64,
        key: Option<i64>,
        changes: TodoChanges,
    ) -> TodoResult<()> {
        let key = require_key(key)?;
        self.find_owned(caller, key, "update").await?;

        if changes.is_empty() {
            debug!(owner_key = caller, key, "Update without changes");
        } else {
            let updated = self
                .repo
                .update(caller, key, &changes)
                .await
                .map_err(|e| TodoError::persistence("update", e))?;

            if !updated {
                return Err(TodoError::Persistence {
                    operation: "update",
                    source: None,
                });
            }
            info!(owner_key = caller, key, "Todo updated");
        }

        self.invalidate(caller).await;
        Ok(())
    }

    /// Soft-deletes one of the caller's notes
    ///
    /// Ownership is checked by the lookup; the delete itself acts on the key.
    pub async fn delete(&self, caller: i64, key: Option<i64>) -> TodoResult<()> {
        let key = require_key(key)?;
        self.find_owned(caller, key, "delete").await?;

        let deleted = self
            .repo
            .soft_delete(key)
            .await
            .map_err(|e| TodoError::persistence("delete", e))?;

        if !deleted {
            return Err(TodoError::Persistence {
                operation: "delete",
                source: None,
            });
        }

        info!(owner_key = caller, key, "Todo deleted");
        self.invalidate(caller).await;
        Ok(())
    }

    async fn find_owned(
        &self,
        caller: i64,
        key: i64,
        operation: &'static str,
    ) -> TodoResult<TodoRecord> {
        self.repo
            .find_by_owner_and_key(caller, key)
            .await
            .map_err(|e| TodoError::persistence(operation, e))?
            .ok_or_else(|| TodoError::NotFound("Todo is not found.".to_string()))
    }

    /// Best-effort: failures are logged, never returned
    async fn invalidate(&self, caller: i64) {
        if let Err(e) = self.cache.invalidate(caller).await {
            warn!(owner_key = caller, error = %e, "Failed to invalidate list view cache");
        }
    }
}

fn require_key(key: Option<i64>) -> TodoResult<i64> {
    key.ok_or_else(|| TodoError::InvalidArgument("key is required".to_string()))
}
