/// Common test utilities for integration tests
///
/// Builds the full router over the in-memory repository and the recording
/// cache invalidator, and mints bearer tokens for test users.

use axum::body::Body;
use axum::http::{header, Request, Response};
use std::sync::Arc;
use todolist_api::app::{build_router, AppState};
use todolist_api::config::{ApiConfig, Config, JwtConfig};
use todolist_shared::auth::jwt::{create_token, Claims};
use todolist_shared::cache::{RecordingCacheInvalidator, RedisConfig};
use todolist_shared::db::pool::DatabaseConfig;
use todolist_shared::repository::InMemoryTodoRepository;
use todolist_shared::service::TodoService;
use tower::Service as _;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing all necessary resources
pub struct TestContext {
    pub repo: InMemoryTodoRepository,
    pub cache: RecordingCacheInvalidator,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        let config = test_config();
        let repo = InMemoryTodoRepository::new();
        let cache = RecordingCacheInvalidator::new();

        let todos = TodoService::new(Arc::new(repo.clone()), Arc::new(cache.clone()));
        let app = build_router(AppState::new(todos, config.clone()));

        TestContext {
            repo,
            cache,
            app,
            config,
        }
    }

    /// Bearer header value for the given user
    pub fn auth_header(&self, user_key: i64) -> String {
        let token = create_token(&Claims::new(user_key), &self.config.jwt.secret)
            .expect("Failed to create token");
        format!("Bearer {}", token)
    }

    /// Sends a request as `user_key`, with an optional JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        user_key: i64,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, self.auth_header(user_key));

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.call(request).await
    }

    /// Sends a raw body as `user_key` without setting a content type
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        user_key: i64,
        body: &'static str,
    ) -> Response<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, self.auth_header(user_key))
            .body(Body::from(body))
            .expect("Failed to build request");

        self.call(request).await
    }

    pub async fn call(&self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .call(request)
            .await
            .expect("Router is infallible")
    }
}

/// Reads a response body as JSON
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&body).expect("Body is not JSON")
}

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: "postgresql://unused/test".to_string(),
            max_connections: 1,
            run_migrations: false,
            ..Default::default()
        },
        redis: RedisConfig {
            url: "redis://unused:6379".to_string(),
            command_timeout_secs: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}
