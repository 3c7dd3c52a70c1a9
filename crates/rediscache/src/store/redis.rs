//! Redis-backed store.

use std::time::Duration;

use async_trait::async_trait;
use redis::RedisError;
use redis::aio::MultiplexedConnection;
use tracing::{debug, info, warn};

use rediscache_core::{CacheError, CacheStore, Expiration, Result};

use crate::config::RedisConfig;

/// A store backed by a Redis server.
///
/// Holds a single multiplexed connection for its whole lifetime. The
/// connection is cloned per call; clones share one socket and the `redis`
/// crate serializes access to it, so a `RedisStore` can be used from many
/// tasks at once.
#[derive(Clone)]
pub struct RedisStore {
    connection: MultiplexedConnection,
    address: String,
    authenticated: bool,
}

impl RedisStore {
    /// Connects to the server described by `config`.
    ///
    /// An unauthenticated connection is tried first and probed with `PING`.
    /// If that fails and credentials are configured, a second connection is
    /// opened with them and probed again. Each attempt is bounded by the
    /// configured connect timeout.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the last attempt fails.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let address = config.address();
        let timeout = config.connect_timeout();

        match open(&config.connection_url(false), timeout).await {
            Ok(connection) => {
                info!(address = %address, "Connected to Redis");
                return Ok(Self {
                    connection,
                    address,
                    authenticated: false,
                });
            },
            Err(e) if !config.has_credentials() => return Err(e),
            Err(e) => {
                warn!(
                    address = %address,
                    error = %e,
                    "Unauthenticated Redis connection failed, retrying with credentials"
                );
            },
        }

        let connection = open(&config.connection_url(true), timeout).await?;
        info!(address = %address, "Connected to Redis with credentials");

        Ok(Self {
            connection,
            address,
            authenticated: true,
        })
    }

    /// Returns the `host:port` this store is connected to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns true if the connection was opened with credentials.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

async fn open(url: &str, timeout: Duration) -> Result<MultiplexedConnection> {
    let client = redis::Client::open(url).map_err(connection_error)?;

    let attempt = async {
        let mut connection = client.get_multiplexed_async_connection().await?;
        ping(&mut connection).await?;
        Ok::<_, RedisError>(connection)
    };

    tokio::time::timeout(timeout, attempt)
        .await
        .map_err(|_| {
            CacheError::connection(format!(
                "connection attempt timed out after {}s",
                timeout.as_secs()
            ))
        })?
        .map_err(connection_error)
}

async fn ping(connection: &mut MultiplexedConnection) -> std::result::Result<(), RedisError> {
    let pong: String = redis::cmd("PING").query_async(connection).await?;
    debug!(reply = %pong, "Redis PING");
    Ok(())
}

fn connection_error(err: RedisError) -> CacheError {
    CacheError::connection(err.to_string())
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn set(&self, key: &str, value: &str, expiration: Expiration) -> Result<()> {
        let mut connection = self.connection.clone();

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(secs) = expiration.as_secs() {
            cmd.arg("EX").arg(secs.max(1));
        }

        let _: () = cmd
            .query_async(&mut connection)
            .await
            .map_err(connection_error)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String> {
        let mut connection = self.connection.clone();

        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut connection)
            .await
            .map_err(connection_error)?;

        value.ok_or_else(|| CacheError::not_found(key))
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        let mut connection = self.connection.clone();

        redis::cmd("DEL")
            .arg(keys)
            .query_async(&mut connection)
            .await
            .map_err(connection_error)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut connection = self.connection.clone();

        redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut connection)
            .await
            .map_err(connection_error)
    }

    async fn ping(&self) -> Result<()> {
        let mut connection = self.connection.clone();
        ping(&mut connection).await.map_err(connection_error)
    }

    fn name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("address", &self.address)
            .field("authenticated", &self.authenticated)
            .finish()
    }
}
