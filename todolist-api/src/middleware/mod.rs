/// Middleware for the API server
///
/// - `security`: Hardening headers on every response
///
/// Bearer-token authentication lives in `app::jwt_auth_layer`.

pub mod security;
