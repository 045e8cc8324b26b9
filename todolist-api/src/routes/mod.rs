/// API route handlers
///
/// - `health`: Health check endpoint
/// - `todos`: Per-user to-do CRUD

pub mod health;
pub mod todos;
