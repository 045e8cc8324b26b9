/// Cache invalidation for per-user list views
///
/// A rendered list of a user's notes may be cached under a key derived from
/// a SHA-256 hash of the owner key. Every successful write drops that entry so
/// the next read recomputes it.

use super::client::{RedisClient, RedisClientError};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Prefix of cached list-view keys
pub const LIST_VIEW_KEY_PREFIX: &str = "todo_list_view:";

/// Cache invalidation errors
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Redis rejected or failed the command
    #[error(transparent)]
    Redis(#[from] RedisClientError),

    /// The cache backend is not accepting writes
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// Builds the cache key of an owner's list view
///
/// # Example
///
/// ```
/// use todolist_shared::cache::list_view_cache_key;
///
/// let key = list_view_cache_key(1);
/// assert!(key.starts_with("todo_list_view:"));
/// assert_eq!(key, list_view_cache_key(1));
/// ```
pub fn list_view_cache_key(owner_key: i64) -> String {
    let digest = Sha256::digest(owner_key.to_string().as_bytes());
    format!("{}{}", LIST_VIEW_KEY_PREFIX, hex::encode(digest))
}

/// Drops cached aggregates after a write
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Removes the cached list view of `owner_key`
    async fn invalidate(&self, owner_key: i64) -> Result<(), CacheError>;

    /// Checks that the cache backend answers
    async fn ping(&self) -> Result<(), CacheError>;
}

/// Invalidator that deletes keys from Redis
#[derive(Clone)]
pub struct RedisCacheInvalidator {
    client: RedisClient,
}

impl RedisCacheInvalidator {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CacheInvalidator for RedisCacheInvalidator {
    async fn invalidate(&self, owner_key: i64) -> Result<(), CacheError> {
        let key = list_view_cache_key(owner_key);
        let removed = self.client.delete(&key).await?;

        tracing::debug!(owner_key, removed, "Invalidated list view cache");
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        if self.client.ping().await? {
            Ok(())
        } else {
            Err(CacheError::Unavailable("unexpected PING reply".to_string()))
        }
    }
}

/// Invalidator that records the keys it was asked to drop
///
/// Used in tests to observe when and for whom invalidation happened.
#[derive(Debug, Clone, Default)]
pub struct RecordingCacheInvalidator {
    invalidated: Arc<Mutex<Vec<String>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingCacheInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent invalidations (after recording) and pings fail
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Keys invalidated so far, oldest first
    pub async fn invalidated(&self) -> Vec<String> {
        self.invalidated.lock().await.clone()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingCacheInvalidator {
    async fn invalidate(&self, owner_key: i64) -> Result<(), CacheError> {
        self.invalidated
            .lock()
            .await
            .push(list_view_cache_key(owner_key));

        if self.fail.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("recording invalidator set to fail".to_string()));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("recording invalidator set to fail".to_string()));
        }
        Ok(())
    }
}
