/// Redis integration and cache invalidation
///
/// # Modules
///
/// - `client`: Redis connection manager wrapper with health checks
/// - `invalidator`: The `CacheInvalidator` trait and its backends
///
/// # Example
///
/// ```no_run
/// use todolist_shared::cache::{CacheInvalidator, RedisCacheInvalidator, RedisClient, RedisConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RedisClient::new(RedisConfig::from_env()?).await?;
/// let cache = RedisCacheInvalidator::new(client);
///
/// // Drop owner 1's cached list view
/// cache.invalidate(1).await?;
/// # Ok(())
/// # }
/// ```

pub mod client;
pub mod invalidator;

pub use client::{RedisClient, RedisClientError, RedisConfig};
pub use invalidator::{
    list_view_cache_key, CacheError, CacheInvalidator, RecordingCacheInvalidator,
    RedisCacheInvalidator,
};
