//! Wildcard deletion.

use std::time::Instant;

use tracing::{debug, info, warn};

use rediscache_core::Result;

use crate::cache::RedisCache;

/// Outcome of a wildcard delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationResult {
    pub pattern: String,
    /// Keys returned by the listing.
    pub matched: usize,
    /// Keys that still existed when their delete ran.
    pub deleted: u64,
}

impl RedisCache {
    /// Deletes every key matching a glob pattern.
    ///
    /// The pattern is resolved by the store (`KEYS`), then each match is
    /// deleted one at a time. This is not atomic:
    /// - keys created after the listing survive
    /// - if a delete fails, the ones already issued stay applied and the
    ///   error is returned
    ///
    /// Pattern examples:
    /// - `"prefix:*"`
    /// - `"*:suffix"`
    /// - `"*"` (every key)
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use rediscache::{MemoryStore, RedisCache};
    /// # #[tokio::main]
    /// # async fn main() -> rediscache::Result<()> {
    /// # let cache = RedisCache::with_store(Arc::new(MemoryStore::new()));
    /// cache.set("session:1", "a", 0).await?;
    /// cache.set("session:2", "b", 0).await?;
    ///
    /// let result = cache.del_wildcard("session:*").await?;
    /// assert_eq!(result.matched, 2);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn del_wildcard(&self, pattern: &str) -> Result<InvalidationResult> {
        let start = Instant::now();
        let listed = self.store.keys(pattern).await;
        if listed.is_err() {
            self.metrics.record("del_wildcard", &listed, start.elapsed());
        }
        let keys = listed?;

        if keys.is_empty() {
            debug!(pattern = %pattern, "No keys matched pattern");
            let result = Ok(InvalidationResult {
                pattern: pattern.to_string(),
                matched: 0,
                deleted: 0,
            });
            self.metrics.record("del_wildcard", &result, start.elapsed());
            return result;
        }

        let mut deleted = 0;
        let mut failure = None;
        for key in &keys {
            match self.store.del(std::slice::from_ref(key)).await {
                Ok(removed) => deleted += removed,
                Err(e) => {
                    failure = Some(e);
                    break;
                },
            }
        }

        // Deletes issued before a failure stay applied and are counted.
        self.metrics.record_deleted(deleted);

        let result = match failure {
            Some(e) => Err(e),
            None => Ok(InvalidationResult {
                pattern: pattern.to_string(),
                matched: keys.len(),
                deleted,
            }),
        };
        self.metrics.record("del_wildcard", &result, start.elapsed());

        match &result {
            Ok(_) => info!(
                pattern = %pattern,
                matched = keys.len(),
                deleted = deleted,
                "Cache entries deleted by pattern"
            ),
            Err(e) => warn!(
                pattern = %pattern,
                matched = keys.len(),
                deleted = deleted,
                error = %e,
                "Wildcard delete aborted, earlier deletes remain applied"
            ),
        }

        result
    }
}
