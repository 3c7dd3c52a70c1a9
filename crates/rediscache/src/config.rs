//! Redis connection configuration.

use std::fmt;
use std::time::Duration;

use rediscache_core::{CacheError, Result};
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables read by [`RedisConfig::from_env`].
pub const ENV_PREFIX: &str = "REDIS";

/// Configuration for a Redis connection.
#[derive(Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Server host name or IP address.
    #[serde(default = "default_host")]
    host: String,

    /// Server port.
    #[serde(default = "default_port")]
    port: u16,

    /// Username for authentication (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,

    /// Password for authentication (optional).
    #[serde(default, skip_serializing)]
    password: Option<String>,

    /// Logical database index.
    #[serde(default)]
    database: i64,

    /// Upper bound for each connection attempt.
    #[serde(default = "default_connect_timeout", with = "duration_secs")]
    connect_timeout: Duration,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
            database: 0,
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl RedisConfig {
    /// Creates a new builder for RedisConfig.
    pub fn builder() -> RedisConfigBuilder {
        RedisConfigBuilder::default()
    }

    /// Loads the configuration from `REDIS_*` environment variables.
    ///
    /// Recognized variables: `REDIS_HOST`, `REDIS_PORT`, `REDIS_USERNAME`,
    /// `REDIS_PASSWORD`, `REDIS_DATABASE` and `REDIS_CONNECT_TIMEOUT`
    /// (seconds). Missing variables fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidConfig` if a variable cannot be parsed
    /// or the resulting configuration is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    /// Loads the configuration from an arbitrary `config` source.
    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let mut config: Self = config::Config::builder()
            .add_source(source)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CacheError::invalid_config(e.to_string()))?;

        config.username = config.username.filter(|u| !u.is_empty());
        config.password = config.password.filter(|p| !p.is_empty());

        config.validate().map_err(CacheError::invalid_config)?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty");
        }
        if self.port == 0 {
            return Err("port must not be zero");
        }
        if self.database < 0 {
            return Err("database must not be negative");
        }
        Ok(())
    }

    /// Returns the server host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the server port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the username for authentication.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the password for authentication.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns the logical database index.
    pub fn database(&self) -> i64 {
        self.database
    }

    /// Returns the timeout applied to each connection attempt.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the `host:port` address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true if a username or a password is configured.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }

    /// Builds a `redis://` URL for this configuration.
    ///
    /// Credentials are percent-encoded and only included when
    /// `with_credentials` is true.
    pub fn connection_url(&self, with_credentials: bool) -> String {
        let auth = match (with_credentials, self.username(), self.password()) {
            (false, _, _) | (true, None, None) => String::new(),
            (true, user, pass) => format!(
                "{}:{}@",
                urlencoding::encode(user.unwrap_or_default()),
                urlencoding::encode(pass.unwrap_or_default())
            ),
        };

        format!("redis://{}{}/{}", auth, self.address(), self.database)
    }
}

impl fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Builder for RedisConfig.
#[derive(Debug, Default)]
pub struct RedisConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    database: i64,
    connect_timeout: Option<Duration>,
}

impl RedisConfigBuilder {
    /// Sets the server host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets both username and password.
    pub fn credentials(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username(username).password(password)
    }

    /// Sets the logical database index.
    pub fn database(mut self, database: i64) -> Self {
        self.database = database;
        self
    }

    /// Sets the timeout applied to each connection attempt.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is empty, the port is zero or the
    /// database index is negative.
    pub fn build(self) -> std::result::Result<RedisConfig, &'static str> {
        let config = RedisConfig {
            host: self.host.unwrap_or_else(default_host),
            port: self.port.unwrap_or_else(default_port),
            // Empty strings mean "not configured"
            username: self.username.filter(|u| !u.is_empty()),
            password: self.password.filter(|p| !p.is_empty()),
            database: self.database,
            connect_timeout: self
                .connect_timeout
                .unwrap_or_else(default_connect_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}

mod duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
