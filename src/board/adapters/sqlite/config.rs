//! Connection settings for the SQLite board store.

use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the database file path.
pub const DATABASE_PATH_VAR: &str = "SQLITE_DATABASE_PATH";
/// Environment variable holding the connection pool size.
pub const MAX_CONNECTIONS_VAR: &str = "BUILDIT_MAX_CONNECTIONS";
/// Environment variable holding the busy timeout in milliseconds.
pub const BUSY_TIMEOUT_MS_VAR: &str = "BUILDIT_BUSY_TIMEOUT_MS";

const IN_MEMORY_PATH: &str = ":memory:";

/// Settings used to open a [`super::SqliteBoardStore`].
///
/// # Examples
///
/// ```
/// use buildit_board::board::adapters::sqlite::StoreConfig;
///
/// let config = StoreConfig::in_memory();
/// assert!(config.is_in_memory());
/// assert_eq!(config.pool_size(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path to the database file, or `:memory:`.
    pub database_path: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: "buildit.sqlite3".to_owned(),
            max_connections: 4,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl StoreConfig {
    /// Creates a configuration for a private in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            database_path: IN_MEMORY_PATH.to_owned(),
            max_connections: 1,
            ..Default::default()
        }
    }

    /// Reads the configuration from process environment variables, falling
    /// back to [`StoreConfig::default`] for unset values.
    ///
    /// # Errors
    ///
    /// Returns [`StoreConfigError`] when a numeric variable cannot be parsed
    /// or the pool size is zero.
    pub fn from_env() -> Result<Self, StoreConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreConfigError`] when a numeric value cannot be parsed or
    /// the pool size is zero.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, StoreConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let database_path = lookup(DATABASE_PATH_VAR)
            .filter(|path| !path.trim().is_empty())
            .unwrap_or(defaults.database_path);
        let max_connections = match lookup(MAX_CONNECTIONS_VAR) {
            Some(raw) => parse_number::<u32>(MAX_CONNECTIONS_VAR, &raw)?,
            None => defaults.max_connections,
        };
        if max_connections == 0 {
            return Err(StoreConfigError::ZeroConnections);
        }
        let busy_timeout = match lookup(BUSY_TIMEOUT_MS_VAR) {
            Some(raw) => Duration::from_millis(parse_number::<u64>(BUSY_TIMEOUT_MS_VAR, &raw)?),
            None => defaults.busy_timeout,
        };
        Ok(Self {
            database_path,
            max_connections,
            busy_timeout,
        })
    }

    /// Returns `true` when the database lives only in memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY_PATH
    }

    /// Effective pool size. An in-memory database exists per connection, so
    /// it is always served by exactly one.
    #[must_use]
    pub fn pool_size(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections
        }
    }

    /// Busy timeout in whole milliseconds, as SQLite expects it.
    #[must_use]
    pub fn busy_timeout_millis(&self) -> u64 {
        u64::try_from(self.busy_timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

fn parse_number<N: std::str::FromStr>(key: &'static str, raw: &str) -> Result<N, StoreConfigError> {
    raw.trim()
        .parse::<N>()
        .map_err(|_| StoreConfigError::InvalidNumber {
            key,
            value: raw.to_owned(),
        })
}

/// Errors raised while reading store configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreConfigError {
    /// A numeric setting could not be parsed.
    #[error("{key} must be a non-negative integer, got '{value}'")]
    InvalidNumber {
        /// Environment variable name.
        key: &'static str,
        /// Rejected raw value.
        value: String,
    },

    /// The pool was configured with no connections.
    #[error("BUILDIT_MAX_CONNECTIONS must be at least 1")]
    ZeroConnections,
}
