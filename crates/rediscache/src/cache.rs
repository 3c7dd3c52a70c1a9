//! Cache facade.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use rediscache_core::{CacheStore, Expiration, Result, hash};

use crate::config::RedisConfig;
use crate::metrics::CacheMetrics;
use crate::store::RedisStore;

/// Thin client over a remote key-value cache.
///
/// Every operation is forwarded to the underlying [`CacheStore`] and its
/// result returned unchanged. The facade keeps no local copy of entries.
/// Cloning is cheap and clones share the same connection, so one instance
/// can be handed to every component that needs it.
///
/// # Examples
///
/// ```no_run
/// use rediscache::{RedisCache, RedisConfig};
///
/// # #[tokio::main]
/// # async fn main() -> rediscache::Result<()> {
/// let config = RedisConfig::builder()
///     .host("localhost")
///     .port(6379)
///     .build()
///     .expect("valid config");
/// let cache = RedisCache::new(&config).await?;
///
/// let key = RedisCache::hash("user:42:profile");
/// cache.set(&key, r#"{"name":"Ada"}"#, 300).await?;
/// let value = cache.get(&key).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisCache {
    pub(crate) store: Arc<dyn CacheStore>,
    pub(crate) metrics: CacheMetrics,
}

impl RedisCache {
    /// Connects to Redis and builds a facade over the connection.
    ///
    /// See [`RedisStore::connect`] for the connection policy.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the server cannot be reached.
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        let store = RedisStore::connect(config).await?;
        Ok(Self::with_store(Arc::new(store)))
    }

    /// Loads the configuration from `REDIS_*` variables and connects.
    pub async fn from_env() -> Result<Self> {
        let config = RedisConfig::from_env()?;
        Self::new(&config).await
    }

    /// Builds a facade over an existing store.
    pub fn with_store(store: Arc<dyn CacheStore>) -> Self {
        info!(store = store.name(), "Cache facade initialized");
        Self {
            store,
            metrics: CacheMetrics::new(),
        }
    }

    /// Stores `value` under `key` for `ttl_seconds`.
    ///
    /// Zero or negative TTLs store the value without expiration.
    pub async fn set(&self, key: &str, value: &str, ttl_seconds: i64) -> Result<()> {
        self.set_with_expiration(key, value, Expiration::from_seconds(ttl_seconds))
            .await
    }

    /// Stores `value` under `key` with an explicit expiration.
    pub async fn set_with_expiration(
        &self,
        key: &str,
        value: &str,
        expiration: Expiration,
    ) -> Result<()> {
        let start = Instant::now();
        let result = self.store.set(key, value, expiration).await;

        self.metrics.record("set", &result, start.elapsed());
        debug!(key = %key, expiration = %expiration, ok = result.is_ok(), "Cache SET");

        result
    }

    /// Retrieves the value stored under `key`.
    ///
    /// # Errors
    ///
    /// - `CacheError::NotFound` if the key is absent or expired
    /// - `CacheError::Connection` if the store is not reachable
    pub async fn get(&self, key: &str) -> Result<String> {
        let start = Instant::now();
        let result = self.store.get(key).await;

        let outcome = self.metrics.record("get", &result, start.elapsed());
        self.metrics.record_lookup(outcome);
        debug!(key = %key, hit = result.is_ok(), "Cache GET");

        result
    }

    /// Deletes the given keys.
    ///
    /// Missing keys are ignored. An empty slice returns immediately without
    /// contacting the store.
    pub async fn del(&self, keys: &[&str]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let start = Instant::now();
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let result = self.store.del(&keys).await;

        self.metrics.record("del", &result, start.elapsed());
        let removed = result?;
        self.metrics.record_deleted(removed);
        debug!(requested = keys.len(), removed = removed, "Cache DEL");

        Ok(())
    }

    /// Checks that the store answers.
    pub async fn ping(&self) -> Result<()> {
        let start = Instant::now();
        let result = self.store.ping().await;

        self.metrics.record("ping", &result, start.elapsed());

        result
    }

    /// Hashes a key into a 64-character hex digest.
    ///
    /// Needs no connection; see [`rediscache_core::hash::hash`].
    pub fn hash(key: &str) -> String {
        hash::hash(key)
    }

    /// Hashes the canonical JSON form of `obj`.
    ///
    /// Serialization failures hash the empty input; see
    /// [`rediscache_core::hash::hash_object`].
    pub fn hash_object<T: Serialize + ?Sized>(obj: &T) -> String {
        hash::hash_object(obj)
    }

    /// Returns the name of the underlying store.
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Returns the metrics for this facade.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.metrics.snapshot();
        f.debug_struct("RedisCache")
            .field("store", &self.store.name())
            .field("hits", &snapshot.hits)
            .field("misses", &snapshot.misses)
            .field("errors", &snapshot.errors)
            .field("hit_rate", &snapshot.hit_rate())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn memory_cache() -> RedisCache {
        RedisCache::with_store(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = memory_cache();

        cache.set("test_key", "test_value", 10).await.unwrap();

        assert_eq!(cache.get("test_key").await.unwrap(), "test_value");
    }

    #[tokio::test]
    async fn test_get_missing_records_miss() {
        let cache = memory_cache();

        assert!(cache.get("missing").await.unwrap_err().is_not_found());
        cache.set("present", "v", 0).await.unwrap();
        cache.get("present").await.unwrap();

        let snapshot = cache.metrics().snapshot();
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.errors, 0);
    }

    #[tokio::test]
    async fn test_debug_shows_hit_rate() {
        let cache = memory_cache();
        cache.set("k", "v", 0).await.unwrap();
        cache.get("k").await.unwrap();
        cache.get("k").await.unwrap();
        cache.get("other").await.unwrap_err();
        cache.get("other").await.unwrap_err();

        let debug = format!("{:?}", cache);

        assert!(debug.contains("store: \"memory\""));
        assert!(debug.contains("hit_rate: 0.5"));
    }

    #[tokio::test]
    async fn test_del_removes_keys() {
        let cache = memory_cache();
        cache.set("a", "1", 0).await.unwrap();
        cache.set("b", "2", 0).await.unwrap();

        cache.del(&["a", "b", "never-existed"]).await.unwrap();

        assert!(cache.get("a").await.unwrap_err().is_not_found());
        assert!(cache.get("b").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let cache = memory_cache();
        let clone = cache.clone();

        cache.set("shared", "yes", 0).await.unwrap();

        assert_eq!(clone.get("shared").await.unwrap(), "yes");
        assert_eq!(clone.store_name(), "memory");
    }

    #[test]
    fn test_hash_helpers_need_no_connection() {
        assert_eq!(RedisCache::hash("k"), hash::hash("k"));
        assert_eq!(
            RedisCache::hash_object(&serde_json::json!({"id": 1})),
            hash::hash(r#"{"id":1}"#)
        );
    }
}
