//! Cache store trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::expiration::Expiration;

/// A key-value store reached by the cache facade.
///
/// This trait abstracts over the remote server so the facade can forward
/// operations without knowing the transport. Expiration, eviction and
/// pattern matching are the store's responsibility.
///
/// # Implementors
///
/// - `RedisStore` - Talks to a Redis server over a multiplexed connection
/// - `MemoryStore` - In-process store for tests and local development
///
/// # Example
///
/// ```ignore
/// use rediscache_core::{CacheStore, Expiration, Result};
///
/// struct NullStore;
///
/// #[async_trait]
/// impl CacheStore for NullStore {
///     async fn set(&self, _key: &str, _value: &str, _exp: Expiration) -> Result<()> {
///         Ok(())
///     }
///     // ...
///     fn name(&self) -> &str {
///         "null"
///     }
/// }
/// ```
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value and TTL.
    ///
    /// # Errors
    ///
    /// - `CacheError::Connection` if the store is not reachable
    async fn set(&self, key: &str, value: &str, expiration: Expiration) -> Result<()>;

    /// Retrieves the value stored under `key`.
    ///
    /// # Errors
    ///
    /// - `CacheError::NotFound` if the key is absent or expired
    /// - `CacheError::Connection` if the store is not reachable
    async fn get(&self, key: &str) -> Result<String>;

    /// Deletes the given keys and returns how many existed.
    ///
    /// Missing keys are not an error. Callers never pass an empty slice.
    async fn del(&self, keys: &[String]) -> Result<u64>;

    /// Lists the keys matching a glob-style pattern (`*`, `?`, `[...]`).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Performs a round-trip liveness probe.
    async fn ping(&self) -> Result<()>;

    /// Returns the name of this store.
    ///
    /// This is used for logging and identification purposes.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockStore {
        entries: Mutex<HashMap<String, String>>,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl CacheStore for MockStore {
        async fn set(&self, key: &str, value: &str, _expiration: Expiration) -> Result<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<String> {
            self.entries
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .ok_or_else(|| CacheError::not_found(key))
        }

        async fn del(&self, keys: &[String]) -> Result<u64> {
            let mut entries = self.entries.lock().unwrap();
            Ok(keys.iter().filter(|k| entries.remove(*k).is_some()).count() as u64)
        }

        async fn keys(&self, _pattern: &str) -> Result<Vec<String>> {
            Ok(self.entries.lock().unwrap().keys().cloned().collect())
        }

        async fn ping(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    #[tokio::test]
    async fn test_mock_store_roundtrip() {
        let store = MockStore::new();

        store.set("a", "1", Expiration::Never).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), "1");

        let removed = store.del(&["a".to_string(), "b".to_string()]).await.unwrap();
        assert_eq!(removed, 1);
        assert!(store.get("a").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_store_as_trait_object() {
        let store: Box<dyn CacheStore> = Box::new(MockStore::new());

        assert_eq!(store.name(), "mock");
        assert!(store.ping().await.is_ok());
    }
}
