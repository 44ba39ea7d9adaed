// Connection pool and statement execution

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::debug;

use watermeter_core::{StorageError, StorageResult};

use crate::config::StorageConfig;
use crate::statements::{InsertStatement, SqlParam};

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a bounded pool; waiting for a connection never exceeds `acquire_timeout`
    pub async fn connect(config: &StorageConfig) -> StorageResult<Self> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.connection_uri)
            .await
            .map_err(StorageError::database)?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Execute one statement in its own transaction and return the affected row count.
    /// The transaction rolls back if execution fails or the future is dropped.
    pub async fn execute(&self, statement: &InsertStatement) -> StorageResult<u64> {
        debug!(sql = %statement.sql, params = statement.params.len(), "executing statement");

        let mut tx = self.pool.begin().await.map_err(StorageError::database)?;

        let mut query = sqlx::query(&statement.sql);
        for param in &statement.params {
            query = match param {
                SqlParam::Text(value) => query.bind(value.as_str()),
                SqlParam::Float(value) => query.bind(*value),
            };
        }

        let result = query
            .execute(&mut *tx)
            .await
            .map_err(StorageError::database)?;
        tx.commit().await.map_err(StorageError::database)?;

        Ok(result.rows_affected())
    }
}
