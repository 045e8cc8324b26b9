/// Authentication utilities
///
/// Token issuance lives in the external authentication service; this module
/// only verifies tokens and resolves the caller.
///
/// # Modules
///
/// - [`jwt`]: JWT validation (HS256) and claims
/// - [`middleware`]: Header parsing and the `AuthContext` request extension

pub mod jwt;
pub mod middleware;
