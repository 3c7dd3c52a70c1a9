//! Store implementations.
//!
//! This module provides the stores a [`RedisCache`](crate::RedisCache) can
//! forward to: Redis itself and an in-process double.

mod memory;
mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;
