//! Connection settings for the `PostgreSQL` bridge message store.

use crate::bridge_message::adapters::postgres::BridgePgPool;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the database URL.
pub const DATABASE_URL_VAR: &str = "BRIDGE_STORE_DATABASE_URL";
/// Environment variable holding the pool size.
pub const MAX_CONNECTIONS_VAR: &str = "BRIDGE_STORE_MAX_CONNECTIONS";
/// Environment variable holding the connection timeout in whole seconds.
pub const CONNECTION_TIMEOUT_VAR: &str = "BRIDGE_STORE_CONNECTION_TIMEOUT_SECS";

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while loading configuration or building the pool.
#[derive(Debug, Error)]
pub enum StoreConfigError {
    /// A required environment variable is unset.
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),

    /// An environment variable holds an unparseable value.
    #[error("environment variable {name} holds invalid value '{value}'")]
    InvalidVariable {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The database URL is empty.
    #[error("database URL must not be empty")]
    EmptyDatabaseUrl,

    /// The pool size is zero.
    #[error("max_connections must be at least 1")]
    ZeroConnections,

    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`StoreConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: String,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

/// Settings for connecting the bridge message store to `PostgreSQL`.
///
/// Deserializes from JSON such as
/// `{"database_url": "postgres://...", "connection_timeout": 5}`; omitted
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long a checkout waits for a free connection.
    #[serde(default = "default_connection_timeout", with = "duration_secs")]
    pub connection_timeout: Duration,
}

const fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

const fn default_connection_timeout() -> Duration {
    DEFAULT_CONNECTION_TIMEOUT
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(
        value: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

impl StoreConfig {
    /// Creates a configuration with default pool settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }

    /// Sets the pool size.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets the checkout timeout.
    #[must_use]
    pub const fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Loads the configuration from `BRIDGE_STORE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`StoreConfigError`] when the URL is unset or a value is
    /// invalid.
    pub fn from_env() -> Result<Self, StoreConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreConfigError`] when the file cannot be read or parsed,
    /// or when the parsed values are invalid.
    pub fn from_json_file(path: impl AsRef<Utf8Path>) -> Result<Self, StoreConfigError> {
        let file_path = path.as_ref();
        let read_error = |source| StoreConfigError::Read {
            path: file_path.to_string(),
            source,
        };
        let file_name = file_path.file_name().ok_or_else(|| {
            read_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path must include a file name",
            ))
        })?;
        let parent = match file_path.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir,
            _ => Utf8Path::new("."),
        };
        let contents = Dir::open_ambient_dir(parent, ambient_authority())
            .and_then(|dir| dir.read_to_string(file_name))
            .map_err(read_error)?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|source| StoreConfigError::Parse {
                path: file_path.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn from_lookup(
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, StoreConfigError> {
        let database_url =
            lookup(DATABASE_URL_VAR).ok_or(StoreConfigError::MissingVariable(DATABASE_URL_VAR))?;
        let mut config = Self::new(database_url);
        if let Some(raw) = lookup(MAX_CONNECTIONS_VAR) {
            config.max_connections = parse_variable(MAX_CONNECTIONS_VAR, raw)?;
        }
        if let Some(raw) = lookup(CONNECTION_TIMEOUT_VAR) {
            config.connection_timeout =
                Duration::from_secs(parse_variable(CONNECTION_TIMEOUT_VAR, raw)?);
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks the URL is present and the pool can hold a connection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreConfigError::EmptyDatabaseUrl`] or
    /// [`StoreConfigError::ZeroConnections`].
    pub fn validate(&self) -> Result<(), StoreConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(StoreConfigError::EmptyDatabaseUrl);
        }
        if self.max_connections == 0 {
            return Err(StoreConfigError::ZeroConnections);
        }
        Ok(())
    }

    /// Builds an r2d2 connection pool from these settings.
    ///
    /// Establishes the initial connections before returning.
    ///
    /// # Errors
    ///
    /// Returns [`StoreConfigError`] when validation fails or the pool cannot
    /// connect.
    pub fn build_pool(&self) -> Result<BridgePgPool, StoreConfigError> {
        self.validate()?;
        let manager = ConnectionManager::<PgConnection>::new(&self.database_url);
        Ok(Pool::builder()
            .max_size(self.max_connections)
            .connection_timeout(self.connection_timeout)
            .build(manager)?)
    }
}

fn parse_variable<T: std::str::FromStr>(
    name: &'static str,
    raw: String,
) -> Result<T, StoreConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| StoreConfigError::InvalidVariable { name, value: raw })
}
