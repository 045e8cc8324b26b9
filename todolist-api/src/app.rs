/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use todolist_api::{app::{build_router, AppState}, config::Config};
/// use todolist_shared::cache::RecordingCacheInvalidator;
/// use todolist_shared::repository::InMemoryTodoRepository;
/// use todolist_shared::service::TodoService;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let todos = TodoService::new(
///     Arc::new(InMemoryTodoRepository::new()),
///     Arc::new(RecordingCacheInvalidator::new()),
/// );
/// let app = build_router(AppState::new(todos, config));
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use todolist_shared::auth::middleware::authenticate;
use todolist_shared::service::TodoService;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// To-do operations over the configured backends
    pub todos: TodoService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(todos: TodoService, config: Config) -> Self {
        Self {
            todos,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token verification
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health               # Health check (public)
/// ├── /todo                 # Authenticated
/// │   ├── GET               # List the caller's notes
/// │   ├── POST              # Create
/// │   └── PUT, DELETE       # 404, key is required
/// ├── /todo/:key            # Authenticated
/// │   ├── GET               # Get one
/// │   ├── PUT               # Partial update
/// │   └── DELETE            # Soft delete
/// └── /api/v1/todo...       # Same routes under the versioned prefix
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, tracing, then bearer-token
/// authentication on the to-do routes only.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let todo_routes = Router::new()
        .route(
            "/todo",
            get(routes::todos::list_todos)
                .post(routes::todos::create_todo)
                .put(routes::todos::update_todo)
                .delete(routes::todos::delete_todo),
        )
        .route(
            "/todo/:key",
            get(routes::todos::get_todo)
                .put(routes::todos::update_todo)
                .delete(routes::todos::delete_todo),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .merge(todo_routes.clone())
        .nest("/api/v1", todo_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Validates the bearer token and injects `AuthContext` into request
/// extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret())?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
