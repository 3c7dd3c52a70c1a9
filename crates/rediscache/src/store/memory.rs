//! In-process store using Moka.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use glob::Pattern;
use moka::future::Cache;
use tracing::debug;

use rediscache_core::{CacheError, CacheStore, Expiration, Result};

/// Stored value with its deadline.
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// A store that keeps entries in process memory.
///
/// Behaves like the Redis store from the facade's point of view (same
/// errors, same glob patterns for `keys`) without a network round-trip.
/// Meant for tests and local development; entries are lost on drop.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rediscache::{MemoryStore, RedisCache};
///
/// # #[tokio::main]
/// # async fn main() -> rediscache::Result<()> {
/// let cache = RedisCache::with_store(Arc::new(MemoryStore::new()));
/// cache.set("greeting", "hola", 0).await?;
/// assert_eq!(cache.get("greeting").await?, "hola");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    inner: Cache<String, Arc<StoredValue>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an unbounded store.
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    /// Returns the number of live (non-expired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.inner
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .count()
    }

    /// Returns true if the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn set(&self, key: &str, value: &str, expiration: Expiration) -> Result<()> {
        let expires_at = expiration.ttl().map(|ttl| Instant::now() + ttl);

        let entry = Arc::new(StoredValue {
            value: value.to_string(),
            expires_at,
        });

        self.inner.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String> {
        match self.inner.get(key).await {
            Some(entry) if entry.is_expired(Instant::now()) => {
                self.inner.invalidate(key).await;
                Err(CacheError::not_found(key))
            },
            Some(entry) => Ok(entry.value.clone()),
            None => Err(CacheError::not_found(key)),
        }
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        let now = Instant::now();
        let mut removed = 0;

        for key in keys {
            if let Some(entry) = self.inner.remove(key.as_str()).await
                && !entry.is_expired(now)
            {
                removed += 1;
            }
        }

        Ok(removed)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let pattern = match Pattern::new(pattern) {
            Ok(p) => p,
            Err(e) => {
                debug!(pattern = %pattern, error = %e, "Invalid glob pattern");
                return Ok(Vec::new());
            },
        };

        let now = Instant::now();
        let mut keys: Vec<String> = self
            .inner
            .iter()
            .filter(|(key, entry)| !entry.is_expired(now) && pattern.matches(key))
            .map(|(key, _)| (*key).clone())
            .collect();
        keys.sort();

        Ok(keys)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.len())
            .finish()
    }
}
