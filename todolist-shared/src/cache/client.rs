/// Redis client wrapper with connection management and health checks
///
/// This module wraps `redis::aio::ConnectionManager`, which reconnects
/// automatically, and adds configuration loading plus a PING health check.
///
/// # Example
///
/// ```no_run
/// use todolist_shared::cache::client::{RedisClient, RedisConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RedisConfig::from_env()?;
/// let client = RedisClient::new(config).await?;
///
/// let healthy = client.ping().await?;
/// println!("Redis healthy: {}", healthy);
/// # Ok(())
/// # }
/// ```

use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Redis client errors
#[derive(Error, Debug)]
pub enum RedisClientError {
    /// Connection error
    #[error("Redis connection error: {0}")]
    ConnectionError(String),

    /// Command execution error
    #[error("Redis command error: {0}")]
    CommandError(String),

    /// Configuration error
    #[error("Redis configuration error: {0}")]
    ConfigError(String),

    /// Command did not answer in time
    #[error("Redis command timed out after {0}s")]
    Timeout(u64),
}

impl From<RedisError> for RedisClientError {
    fn from(err: RedisError) -> Self {
        match err.kind() {
            redis::ErrorKind::IoError => {
                RedisClientError::ConnectionError(format!("IO error: {}", err))
            }
            redis::ErrorKind::ResponseError => {
                RedisClientError::CommandError(format!("Response error: {}", err))
            }
            _ => RedisClientError::CommandError(err.to_string()),
        }
    }
}

/// Redis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    ///
    /// Format: redis://[username:password@]host:port[/db]
    pub url: String,

    /// Command timeout in seconds
    pub command_timeout_secs: u64,
}

impl RedisConfig {
    /// Loads configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// - `REDIS_URL`: Redis connection URL (required)
    /// - `REDIS_COMMAND_TIMEOUT_SECS`: Command timeout (default: 5)
    ///
    /// # Errors
    ///
    /// Returns an error if REDIS_URL is not set.
    pub fn from_env() -> Result<Self, RedisClientError> {
        dotenvy::dotenv().ok();

        let url = env::var("REDIS_URL").map_err(|_| {
            RedisClientError::ConfigError("REDIS_URL environment variable is required".to_string())
        })?;

        let command_timeout_secs = env::var("REDIS_COMMAND_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            url,
            command_timeout_secs,
        })
    }
}

/// Cloneable Redis client
///
/// Cloning shares the same underlying connection manager.
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
    config: Arc<RedisConfig>,
}

impl RedisClient {
    /// Connects to Redis
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the first connection fails.
    pub async fn new(config: RedisConfig) -> Result<Self, RedisClientError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            RedisClientError::ConfigError(format!("Invalid Redis URL: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            RedisClientError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        tracing::info!(
            "Redis client connected successfully to {}",
            sanitize_url(&config.url)
        );

        Ok(Self {
            manager,
            config: Arc::new(config),
        })
    }

    /// Sends PING and reports whether PONG came back
    pub async fn ping(&self) -> Result<bool, RedisClientError> {
        let mut conn = self.manager.clone();

        let result: Result<String, RedisError> = tokio::time::timeout(
            self.command_timeout(),
            redis::cmd("PING").query_async(&mut conn),
        )
        .await
        .map_err(|_| RedisClientError::Timeout(self.config.command_timeout_secs))?;

        match result {
            Ok(pong) if pong == "PONG" => {
                tracing::debug!("Redis health check: PONG received");
                Ok(true)
            }
            Ok(other) => {
                tracing::warn!("Redis health check: unexpected response: {}", other);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes a key, returning how many keys were removed
    pub async fn delete(&self, key: &str) -> Result<u64, RedisClientError> {
        let mut conn = self.manager.clone();

        let removed: u64 = tokio::time::timeout(
            self.command_timeout(),
            redis::cmd("DEL").arg(key).query_async(&mut conn),
        )
        .await
        .map_err(|_| RedisClientError::Timeout(self.config.command_timeout_secs))??;

        Ok(removed)
    }

    fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.config.command_timeout_secs)
    }
}

/// Replaces credentials in a Redis URL with ***:*** for logging
fn sanitize_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(scheme_end) = url.find("://") {
            let scheme = &url[..scheme_end + 3];
            let host = &url[at_pos + 1..];
            return format!("{}***:***@{}", scheme, host);
        }
    }
    url.to_string()
}
