// Database-backed ObservationStore implementation
//
// Each store call maps the record to its insert statement and executes it
// as a single transaction, bounded by the configured statement timeout.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use watermeter_core::{
    IndoorEnvironmentObserved, ObservationStore, StorageError, StorageResult,
    WaterConsumptionObserved, WeatherObserved,
};

use crate::config::StorageConfig;
use crate::repositories::Database;
use crate::statements::{InsertStatement, StatementBuilder};

// ============================================================================
// DbObservationStore - Writes observation rows to Postgres
// ============================================================================

#[derive(Clone)]
pub struct DbObservationStore {
    db: Database,
    statements: StatementBuilder,
    statement_timeout: Duration,
}

impl DbObservationStore {
    pub fn new(db: Database, config: &StorageConfig) -> Self {
        Self {
            db,
            statements: StatementBuilder::new(&config.schema, config.source_label.clone()),
            statement_timeout: config.statement_timeout,
        }
    }

    /// Connect a pool and build the store from configuration
    pub async fn connect(config: &StorageConfig) -> StorageResult<Self> {
        let db = Database::connect(config).await?;
        Ok(Self::new(db, config))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn execute(&self, id: &str, statement: InsertStatement) -> StorageResult<()> {
        let rows = tokio::time::timeout(self.statement_timeout, self.db.execute(&statement))
            .await
            .map_err(|_| StorageError::Timeout(self.statement_timeout))?
            .inspect_err(|e| error!(entity_id = id, error = %e, "failed to insert observation"))?;

        if rows == 0 {
            debug!(entity_id = id, "observation already stored, insert ignored");
        } else {
            debug!(entity_id = id, "observation stored");
        }
        Ok(())
    }
}

#[async_trait]
impl ObservationStore for DbObservationStore {
    async fn store_water_consumption(
        &self,
        record: &WaterConsumptionObserved,
    ) -> StorageResult<()> {
        self.execute(&record.id, self.statements.water_consumption(record))
            .await
    }

    async fn store_indoor_environment(
        &self,
        record: &IndoorEnvironmentObserved,
    ) -> StorageResult<()> {
        self.execute(&record.id, self.statements.indoor_environment(record))
            .await
    }

    async fn store_weather(&self, record: &WeatherObserved) -> StorageResult<()> {
        self.execute(&record.id, self.statements.weather(record))
            .await
    }
}

// ============================================================================
// Factory functions
// ============================================================================

/// Create a database-backed observation store
pub fn create_db_observation_store(db: Database, config: &StorageConfig) -> DbObservationStore {
    DbObservationStore::new(db, config)
}
