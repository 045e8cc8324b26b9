/// Database models for the to-do list
///
/// # Models
///
/// - `todo`: `TodoRecord` plus its create/update inputs and response shapes
///
/// # Example
///
/// ```
/// use todolist_shared::models::todo::{TodoChanges, TodoState};
///
/// let changes = TodoChanges { title: Some("Renamed".to_string()), content: None };
/// assert!(!changes.is_empty());
/// assert!(TodoState::Active.is_active());
/// ```

pub mod todo;
