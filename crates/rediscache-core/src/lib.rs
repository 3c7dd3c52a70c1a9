//! rediscache core - Domain types and traits
//!
//! This crate provides the foundational types shared by every rediscache
//! store: the error type, entry expiration, the [`CacheStore`] trait and
//! the deterministic hashing helpers used to derive cache keys.

pub mod error;
pub mod expiration;
pub mod hash;
pub mod store;

pub use error::{CacheError, Result};
pub use expiration::Expiration;
pub use hash::{hash, hash_object};
pub use store::CacheStore;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
