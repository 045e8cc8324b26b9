//! # Todolist API Server
//!
//! Per-user to-do notes over HTTP: PostgreSQL for storage, Redis for the
//! cached list views that every mutation invalidates.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/todolist \
//! REDIS_URL=redis://localhost:6379 \
//! JWT_SECRET=change-me-to-at-least-32-characters \
//! cargo run -p todolist-api
//! ```

use std::sync::Arc;
use todolist_api::{
    app::{build_router, AppState},
    config::Config,
};
use todolist_shared::{
    cache::{RedisCacheInvalidator, RedisClient},
    db::{
        migrations::{ensure_database_exists, get_migration_status, run_migrations},
        pool::{close_pool, create_pool},
    },
    repository::PgTodoRepository,
    service::TodoService,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!(
        "Todolist API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    if config.creates_missing_database() {
        ensure_database_exists(&config.database.url).await?;
    }

    let pool = create_pool(&config.database).await?;

    if config.database.run_migrations {
        run_migrations(&pool).await?;
        let status = get_migration_status(&pool).await?;
        tracing::info!(
            applied_migrations = status.applied_migrations,
            latest_version = ?status.latest_version,
            "Schema ready"
        );
    }

    let redis = RedisClient::new(config.redis.clone()).await?;

    let repo = Arc::new(PgTodoRepository::new(pool));
    let todos = TodoService::new(repo.clone(), Arc::new(RedisCacheInvalidator::new(redis)));

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(todos, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(repo.pool().clone()).await;

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "todolist_api=debug,todolist_shared=debug,tower_http=debug".into()
    });

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
