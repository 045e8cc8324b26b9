/// To-do endpoints
///
/// Every endpoint requires JWT authentication; the caller's user key from the
/// token is the owner of everything read or written.
///
/// # Endpoints
///
/// - `GET /todo` - List the caller's notes
/// - `GET /todo/:key` - Get one note
/// - `POST /todo` - Create a note
/// - `PUT /todo/:key` - Update title and/or content
/// - `DELETE /todo/:key` - Soft delete a note
///
/// Successful responses use the `{msg, data?}` envelope. A missing or
/// non-numeric `:key` answers 404 "key is required".
///
/// Request bodies are read as JSON whatever the `Content-Type`. An empty body
/// carries no fields; anything else that is not a matching JSON object
/// answers 400.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension, Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use todolist_shared::{
    auth::middleware::AuthContext,
    models::todo::{CreateTodoInput, CreatedTodo, TodoChanges, TodoView},
};

/// Success envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub msg: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn with_data(msg: &str, data: T) -> Self {
        Self {
            msg: msg.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    fn message(msg: &str) -> Self {
        Self {
            msg: msg.to_string(),
            data: None,
        }
    }
}

fn parse_body<T>(body: &[u8]) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// List the caller's active notes
///
/// ```json
/// { "msg": "success", "data": [{ "title": "...", "content": "...", "key": "1" }] }
/// ```
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ApiResponse<Vec<TodoView>>>> {
    let todos = state.todos.list(auth.user_key).await?;
    Ok(Json(ApiResponse::with_data("success", todos)))
}

/// Get one note by key
pub async fn get_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    key: Option<Path<i64>>,
) -> ApiResult<Json<ApiResponse<TodoView>>> {
    let todo = state.todos.get(auth.user_key, key.map(|Path(k)| k)).await?;
    Ok(Json(ApiResponse::with_data("success", todo)))
}

/// Create a note
///
/// An empty body is treated like one with neither field set.
///
/// ```json
/// { "msg": "Create successfully", "data": { "title": "...", "content": "..." } }
/// ```
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<CreatedTodo>>> {
    let input: CreateTodoInput = parse_body(&body)?;
    let created = state.todos.create(auth.user_key, input).await?;
    Ok(Json(ApiResponse::with_data("Create successfully", created)))
}

/// Update a note's title and/or content
///
/// Fields left out of the body keep their stored values.
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    key: Option<Path<i64>>,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<()>>> {
    let changes: TodoChanges = parse_body(&body)?;
    state
        .todos
        .update(auth.user_key, key.map(|Path(k)| k), changes)
        .await?;
    Ok(Json(ApiResponse::message("Update successfully")))
}

/// Soft delete a note
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    key: Option<Path<i64>>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.todos.delete(auth.user_key, key.map(|Path(k)| k)).await?;
    Ok(Json(ApiResponse::message("Delete successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_has_no_fields() {
        let changes: TodoChanges = parse_body(b"").unwrap();
        assert!(changes.is_empty());

        let changes: TodoChanges = parse_body(b" \n").unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_body_fields_are_read() {
        let changes: TodoChanges = parse_body(br#"{"title":"New"}"#).unwrap();
        assert_eq!(changes.title.as_deref(), Some("New"));
        assert_eq!(changes.content, None);
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        for raw in [&br#"{"title":123}"#[..], &b"{not json"[..], &b"[]"[..]] {
            let result: ApiResult<TodoChanges> = parse_body(raw);
            assert!(matches!(result, Err(ApiError::BadRequest(_))));
        }
    }

    #[test]
    fn test_envelope_omits_missing_data() {
        let body = serde_json::to_value(ApiResponse::message("Delete successfully")).unwrap();
        assert_eq!(body, json!({ "msg": "Delete successfully" }));
    }

    #[test]
    fn test_envelope_with_data() {
        let created = CreatedTodo {
            title: "Example Title".to_string(),
            content: "Example Content".to_string(),
        };
        let body = serde_json::to_value(ApiResponse::with_data("Create successfully", created)).unwrap();
        assert_eq!(
            body,
            json!({
                "msg": "Create successfully",
                "data": { "title": "Example Title", "content": "Example Content" }
            })
        );
    }
}
