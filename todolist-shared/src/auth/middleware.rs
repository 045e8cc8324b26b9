/// Request authentication for Axum
///
/// Resolves the caller from the `Authorization: Bearer <token>` header. The
/// API server's auth layer calls [`authenticate`] and inserts the resulting
/// [`AuthContext`] into request extensions, where handlers pick it up with
/// Axum's `Extension` extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use todolist_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_key)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, JwtError};

/// Authenticated caller
///
/// The user key is the owner key of every record the caller touches. It never
/// comes from a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_key: i64,
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not a Bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),
}

/// Resolves the caller from request headers
///
/// # Errors
///
/// - `MissingCredentials` when there is no Authorization header
/// - `InvalidFormat` when it is not `Bearer <token>`
/// - `InvalidToken` when the token fails validation or its subject is not a user key
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let user_key = claims
        .user_key()
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(AuthContext { user_key })
}
