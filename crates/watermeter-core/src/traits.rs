// Storage seam for the pipeline
//
// Implementations:
// - Postgres (watermeter-storage) for production
// - In-memory (crate::memory) for tests and local runs

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::observation::{
    IndoorEnvironmentObserved, Observation, WaterConsumptionObserved, WeatherObserved,
};

/// Persists observation records with conflict-free semantics.
///
/// Storing a record whose `(id, observed_at)` already exists for its kind must
/// succeed without writing anything.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    async fn store_water_consumption(&self, record: &WaterConsumptionObserved)
        -> StorageResult<()>;

    async fn store_indoor_environment(
        &self,
        record: &IndoorEnvironmentObserved,
    ) -> StorageResult<()>;

    async fn store_weather(&self, record: &WeatherObserved) -> StorageResult<()>;

    /// Store any observation with the writer for its kind
    async fn store(&self, observation: &Observation) -> StorageResult<()> {
        match observation {
            Observation::WaterConsumption(record) => self.store_water_consumption(record).await,
            Observation::IndoorEnvironment(record) => self.store_indoor_environment(record).await,
            Observation::Weather(record) => self.store_weather(record).await,
        }
    }
}
