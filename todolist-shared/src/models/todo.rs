/// To-do record model
///
/// This module provides the `TodoRecord` entity: a short text note owned by a
/// single user. Records are never physically removed; deleting one stamps
/// `deleted_at` and every normal read path filters those rows out.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todo_lists (
///     key BIGSERIAL PRIMARY KEY,
///     title TEXT NOT NULL,
///     content TEXT NOT NULL,
///     owner_key BIGINT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```
///
/// # Lifecycle
///
/// ```text
/// insert ──> Active ──update──> Active
///              │
///              └──soft delete──> Deleted { at }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Soft-delete state of a record
///
/// Storage keeps a single nullable `deleted_at` column; this is the tagged view of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoState {
    /// Visible to the owner
    Active,

    /// Logically deleted at the given instant
    Deleted { at: DateTime<Utc> },
}

impl TodoState {
    /// Checks if the record is visible to normal reads
    pub fn is_active(&self) -> bool {
        matches!(self, TodoState::Active)
    }
}

/// To-do record as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TodoRecord {
    /// Store-assigned key, unique across all owners
    pub key: i64,

    /// Note title
    pub title: String,

    /// Note body
    pub content: String,

    /// Key of the user who created the record
    pub owner_key: i64,

    /// When the record was inserted
    pub created_at: DateTime<Utc>,

    /// When the record was last written
    pub updated_at: DateTime<Utc>,

    /// When the record was soft-deleted (None while active)
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TodoRecord {
    /// Returns the soft-delete state derived from `deleted_at`
    pub fn state(&self) -> TodoState {
        match self.deleted_at {
            None => TodoState::Active,
            Some(at) => TodoState::Deleted { at },
        }
    }

    /// Checks whether the record belongs to the given owner
    pub fn is_owned_by(&self, owner_key: i64) -> bool {
        self.owner_key == owner_key
    }

    /// Applies the present fields of `changes` in place
    pub fn apply(&mut self, changes: &TodoChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(content) = &changes.content {
            self.content = content.clone();
        }
    }
}

/// Input for inserting a new record
///
/// The owner always comes from the authenticated caller.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub owner_key: i64,
    pub title: String,
    pub content: String,
}

/// Partial update of a record
///
/// `None` leaves the stored value untouched. `Some("")` is applied as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoChanges {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub content: Option<String>,
}

impl TodoChanges {
    /// Checks whether no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Create request body
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateTodoInput {
    #[serde(default)]
    #[validate(
        required(message = "title is required"),
        length(min = 1, message = "title must not be empty")
    )]
    pub title: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "content is required"),
        length(min = 1, message = "content must not be empty")
    )]
    pub content: Option<String>,
}

/// Read-side representation returned by list and get
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoView {
    pub title: String,
    pub content: String,

    /// Record key, serialized as a string
    pub key: String,
}

impl From<TodoRecord> for TodoView {
    fn from(record: TodoRecord) -> Self {
        Self {
            title: record.title,
            content: record.content,
            key: record.key.to_string(),
        }
    }
}

/// Payload echoed back after a create
///
/// The assigned key is intentionally not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTodo {
    pub title: String,
    pub content: String,
}
