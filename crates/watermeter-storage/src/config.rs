// Storage configuration loaded from environment variables.
// Decision: Keep the variable names of the deployed service (DB_SCHEMA, WCO_SOURCE, PG_*)
// Decision: PG_CONNECTION_URL wins over the individual PG_* parts

use std::fmt;
use std::time::Duration;

use watermeter_core::{StorageError, StorageResult};

pub const DEFAULT_SCHEMA: &str = "geodata_vattenmatare";
pub const DEFAULT_SOURCE_LABEL: &str = "Göteborgs Stads kretslopp och vattennämnd";
const DEFAULT_PG_PORT: &str = "5432";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the storage writer, built once at startup
#[derive(Clone)]
pub struct StorageConfig {
    /// Database schema holding the observation tables
    pub schema: String,
    /// Data provider label attached to every row
    pub source_label: String,
    pub connection_uri: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection
    pub acquire_timeout: Duration,
    /// Upper bound on a single store call
    pub statement_timeout: Duration,
}

impl StorageConfig {
    pub fn new(
        schema: impl Into<String>,
        source_label: impl Into<String>,
        connection_uri: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            source_label: source_label.into(),
            connection_uri: connection_uri.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> StorageResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StorageResult<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let schema = var("DB_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
        let source_label =
            var("WCO_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE_LABEL.to_string());

        let connection_uri = match var("PG_CONNECTION_URL") {
            Some(url) => url,
            None => {
                let host = var("PG_HOSTNAME").ok_or_else(|| {
                    StorageError::config("PG_CONNECTION_URL or PG_HOSTNAME must be set")
                })?;
                format!(
                    "postgres://{}:{}@{}:{}/{}",
                    var("PG_USER").unwrap_or_default(),
                    var("PG_PASSWORD").unwrap_or_default(),
                    host,
                    var("PG_PORT").unwrap_or_else(|| DEFAULT_PG_PORT.to_string()),
                    var("PG_DATABASE").unwrap_or_default(),
                )
            }
        };

        let max_connections = parse_or(
            var("PG_MAX_CONNECTIONS"),
            "PG_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
        )?;
        let acquire_timeout = parse_or(
            var("PG_ACQUIRE_TIMEOUT_SECS"),
            "PG_ACQUIRE_TIMEOUT_SECS",
            DEFAULT_ACQUIRE_TIMEOUT.as_secs(),
        )
        .map(Duration::from_secs)?;
        let statement_timeout = parse_or(
            var("PG_STATEMENT_TIMEOUT_SECS"),
            "PG_STATEMENT_TIMEOUT_SECS",
            DEFAULT_STATEMENT_TIMEOUT.as_secs(),
        )
        .map(Duration::from_secs)?;

        let config = Self {
            schema,
            source_label,
            connection_uri,
            max_connections,
            acquire_timeout,
            statement_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> StorageResult<()> {
        if self.schema.trim().is_empty() {
            return Err(StorageError::config("schema must not be empty"));
        }
        if self.connection_uri.trim().is_empty() {
            return Err(StorageError::config("connection URI must not be empty"));
        }
        if self.max_connections == 0 {
            return Err(StorageError::config("max_connections must be at least 1"));
        }
        Ok(())
    }
}

// connection_uri carries credentials
impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("schema", &self.schema)
            .field("source_label", &self.source_label)
            .field("connection_uri", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("statement_timeout", &self.statement_timeout)
            .finish()
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &str,
    default: T,
) -> StorageResult<T> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| StorageError::config(format!("{key} has an invalid value: {v}"))),
        None => Ok(default),
    }
}
