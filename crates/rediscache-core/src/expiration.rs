//! Entry expiration.

use std::fmt;
use std::time::Duration;

/// How long the server keeps an entry before treating it as expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Expiration {
    /// The entry never expires.
    #[default]
    Never,
    /// The entry expires after the given duration.
    After(Duration),
}

impl Expiration {
    /// Builds an expiration from a TTL in seconds.
    ///
    /// Zero and negative values mean "no expiration", which is what the
    /// server does for a plain `SET` without `EX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use rediscache_core::Expiration;
    ///
    /// assert_eq!(Expiration::from_seconds(10), Expiration::After(Duration::from_secs(10)));
    /// assert_eq!(Expiration::from_seconds(0), Expiration::Never);
    /// assert_eq!(Expiration::from_seconds(-1), Expiration::Never);
    /// ```
    pub fn from_seconds(ttl_seconds: i64) -> Self {
        if ttl_seconds <= 0 {
            Self::Never
        } else {
            Self::After(Duration::from_secs(ttl_seconds as u64))
        }
    }

    /// Returns the TTL, or `None` if the entry never expires.
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::After(d) => Some(*d),
        }
    }

    /// Returns the TTL in whole seconds, or `None` if the entry never expires.
    pub fn as_secs(&self) -> Option<u64> {
        self.ttl().map(|d| d.as_secs())
    }
}

impl From<Option<Duration>> for Expiration {
    fn from(ttl: Option<Duration>) -> Self {
        match ttl {
            Some(d) if !d.is_zero() => Self::After(d),
            _ => Self::Never,
        }
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => write!(f, "never"),
            Self::After(d) => write!(f, "{}s", d.as_secs()),
        }
    }
}
