/// PostgreSQL pool for the `todo_lists` store
///
/// `DatabaseConfig` is the one place database settings live; the API server
/// embeds it in its own configuration and hands it to [`create_pool`].
///
/// # Environment Variables
///
/// - `DATABASE_URL`: Connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool ceiling (default: 10)
/// - `DATABASE_MIN_CONNECTIONS`: Connections kept warm (default: 1)
/// - `DATABASE_ACQUIRE_TIMEOUT_SECS`: Wait for a free connection (default: 30)
/// - `DATABASE_IDLE_TIMEOUT_SECS`: Idle connection lifetime, `0` disables (default: 600)
/// - `RUN_MIGRATIONS`: Apply pending migrations at startup (default: true)
///
/// # Example
///
/// ```no_run
/// use todolist_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DatabaseConfig::from_env()?;
/// let pool = create_pool(&config).await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Errors reading database settings
#[derive(Debug, thiserror::Error)]
pub enum DatabaseConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    pub max_connections: u32,

    pub min_connections: u32,

    /// Seconds to wait for a free connection
    pub acquire_timeout_secs: u64,

    /// Seconds before an idle connection is closed; `None` keeps them open
    pub idle_timeout_secs: Option<u64>,

    /// Whether the server applies pending migrations at startup
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: Some(600),
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    /// Reads settings from the process environment
    pub fn from_env() -> Result<Self, DatabaseConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DatabaseConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(DatabaseConfigError::Missing("DATABASE_URL"))?;

        let idle_timeout_secs = match parse_var(&lookup, "DATABASE_IDLE_TIMEOUT_SECS")? {
            Some(0) => None,
            Some(secs) => Some(secs),
            None => defaults.idle_timeout_secs,
        };

        let run_migrations = match lookup("RUN_MIGRATIONS") {
            Some(raw) => parse_flag(&raw).ok_or(DatabaseConfigError::Invalid {
                name: "RUN_MIGRATIONS",
                value: raw,
            })?,
            None => defaults.run_migrations,
        };

        Ok(Self {
            url,
            max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
            min_connections: parse_var(&lookup, "DATABASE_MIN_CONNECTIONS")?
                .unwrap_or(defaults.min_connections),
            acquire_timeout_secs: parse_var(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS")?
                .unwrap_or(defaults.acquire_timeout_secs),
            idle_timeout_secs,
            run_migrations,
        })
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(self.idle_timeout_secs.map(Duration::from_secs))
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, DatabaseConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DatabaseConfigError::Invalid { name, value: raw }),
        None => Ok(None),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Connects and verifies the pool with [`health_check`]
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout_secs,
        idle_timeout_secs = ?config.idle_timeout_secs,
        "Connecting to PostgreSQL"
    );

    let pool = config.pool_options().connect(&config.url).await?;
    health_check(&pool).await?;

    info!(stats = ?get_pool_stats(&pool), "PostgreSQL pool ready");
    Ok(pool)
}

/// Round-trips `SELECT 1`
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;

    if one != 1 {
        return Err(sqlx::Error::Protocol(format!(
            "health check returned {} instead of 1",
            one
        )));
    }

    debug!("PostgreSQL health check passed");
    Ok(())
}

/// Connection counts for a pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    /// Connections currently checked out
    pub active_connections: usize,

    pub idle_connections: usize,

    pub total_connections: usize,
}

pub fn get_pool_stats(pool: &PgPool) -> PoolStats {
    let total = pool.size() as usize;
    let idle = pool.num_idle();

    PoolStats {
        active_connections: total.saturating_sub(idle),
        idle_connections: idle,
        total_connections: total,
    }
}

/// Waits for checked-out connections to come back, then closes the pool
pub async fn close_pool(pool: PgPool) {
    info!(stats = ?get_pool_stats(&pool), "Closing PostgreSQL pool");
    pool.close().await;
}
