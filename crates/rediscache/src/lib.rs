//! # rediscache
//!
//! A thin client over a remote Redis cache.
//!
//! Storage, expiration, eviction and pattern matching all happen on the
//! server. This crate forwards five operations to it and adds two pure
//! hashing helpers for deriving cache keys.
//!
//! ## Features
//!
//! - `set` with TTL, `get`, `del` (variadic), `del_wildcard` and `ping`
//! - SHA-256 key hashing and canonical-JSON object hashing
//! - Connection probe at construction, retried once with credentials
//! - In-process [`MemoryStore`] for tests and local development
//! - `tracing` logs and `metrics` counters per operation
//!
//! ## Example
//!
//! ```ignore
//! use rediscache::{RedisCache, RedisConfig};
//!
//! let config = RedisConfig::builder()
//!     .host("localhost")
//!     .port(6379)
//!     .credentials("app", "secret")
//!     .build()?;
//!
//! let cache = RedisCache::new(&config).await?;
//!
//! let key = RedisCache::hash_object(&query);
//! cache.set(&key, &payload, 60).await?;
//! cache.del_wildcard("report:*").await?;
//! ```

pub mod cache;
pub mod config;
pub mod invalidation;
pub mod metrics;
pub mod store;

// Re-exports
pub use self::cache::RedisCache;
pub use self::config::{RedisConfig, RedisConfigBuilder};
pub use self::invalidation::InvalidationResult;
pub use self::metrics::{CacheMetrics, MetricsSnapshot, Outcome, register_cache_metrics};
pub use self::store::{MemoryStore, RedisStore};

// Re-export rediscache_core for consumers
pub use rediscache_core;
pub use rediscache_core::{CacheError, CacheStore, Expiration, Result};
