/// Business logic layer
///
/// - `todo`: `TodoService` and its error taxonomy

pub mod todo;

pub use todo::{BackendHealth, TodoError, TodoResult, TodoService};
