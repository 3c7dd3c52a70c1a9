//! Error types for cache operations.
//!
//! Every fallible operation in rediscache returns [`Result<T>`], whose error
//! side is [`CacheError`]. Two kinds matter to callers:
//!
//! - [`CacheError::NotFound`]: the key is absent or has expired (only `get`
//!   produces it).
//! - [`CacheError::Connection`]: the server could not be reached or answered
//!   with a protocol-level failure.
//!
//! Nothing retries automatically; [`CacheError::is_transient`] tells callers
//! which errors are worth retrying at a higher level.
//!
//! # Example
//!
//! ```
//! use rediscache_core::{CacheError, Result};
//!
//! fn lookup(key: &str) -> Result<String> {
//!     Err(CacheError::not_found(key))
//! }
//!
//! match lookup("session:42") {
//!     Ok(value) => println!("cached: {}", value),
//!     Err(e) if e.is_not_found() => println!("miss"),
//!     Err(e) => eprintln!("cache error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Errors that can occur when talking to a cache store.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The key does not exist or has expired.
    #[error("key not found: {key}")]
    NotFound {
        /// The key that was requested
        key: String,
    },

    /// Transport, server or protocol failure.
    #[error("connection error: {0}")]
    Connection(String),

    /// The client configuration could not be loaded or is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Creates a NotFound error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a Connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Returns true if this error indicates the key was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        self.is_connection()
    }
}

/// Type alias for Results with CacheError.
pub type Result<T> = std::result::Result<T, CacheError>;
