// In-memory ObservationStore for tests and local runs
//
// Rows are keyed by (kind, id, observed_at) like the Postgres tables, and a
// duplicate key is a silent no-op.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageResult;
use crate::observation::{
    IndoorEnvironmentObserved, Observation, ObservationKind, WaterConsumptionObserved,
    WeatherObserved,
};
use crate::traits::ObservationStore;

type RowKey = (ObservationKind, String, String);

#[derive(Debug, Default)]
struct Tables {
    keys: HashSet<RowKey>,
    rows: Vec<Observation>,
    attempts: usize,
}

/// In-memory observation store
#[derive(Debug, Default, Clone)]
pub struct InMemoryObservationStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored rows in insertion order
    pub async fn rows(&self) -> Vec<Observation> {
        self.tables.read().await.rows.clone()
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tables.read().await.rows.is_empty()
    }

    /// Number of store calls received, including no-op duplicates
    pub async fn attempts(&self) -> usize {
        self.tables.read().await.attempts
    }

    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }

    async fn insert(&self, observation: Observation) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        tables.attempts += 1;

        let key = (
            observation.kind(),
            observation.id().to_string(),
            observation.observed_at().to_string(),
        );
        if tables.keys.insert(key) {
            tables.rows.push(observation);
        } else {
            tracing::debug!(
                id = observation.id(),
                observed_at = observation.observed_at(),
                "row already exists, insert ignored"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl ObservationStore for InMemoryObservationStore {
    async fn store_water_consumption(
        &self,
        record: &WaterConsumptionObserved,
    ) -> StorageResult<()> {
        self.insert(record.clone().into()).await
    }

    async fn store_indoor_environment(
        &self,
        record: &IndoorEnvironmentObserved,
    ) -> StorageResult<()> {
        self.insert(record.clone().into()).await
    }

    async fn store_weather(&self, record: &WeatherObserved) -> StorageResult<()> {
        self.insert(record.clone().into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Point;

    fn weather(id: &str, observed_at: &str, temperature: f64) -> WeatherObserved {
        WeatherObserved {
            id: id.to_string(),
            temperature,
            observed_at: observed_at.to_string(),
            location: Point::new(17.285092, 62.392013),
        }
    }

    #[tokio::test]
    async fn test_duplicate_is_noop() {
        let store = InMemoryObservationStore::new();
        let record = weather("urn:ngsi-ld:WeatherObserved:1", "2023-01-31T12:45:54Z", 2.3);

        store.store_weather(&record).await.unwrap();
        store.store_weather(&record).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.attempts().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_does_not_overwrite() {
        let store = InMemoryObservationStore::new();

        store
            .store_weather(&weather("w1", "2023-01-31T12:45:54Z", 2.3))
            .await
            .unwrap();
        store
            .store_weather(&weather("w1", "2023-01-31T12:45:54Z", 9.9))
            .await
            .unwrap();

        let rows = store.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            Observation::Weather(weather("w1", "2023-01-31T12:45:54Z", 2.3))
        );
    }

    #[tokio::test]
    async fn test_key_includes_observed_at_and_kind() {
        let store = InMemoryObservationStore::new();

        store
            .store_weather(&weather("w1", "2023-01-31T12:45:54Z", 2.3))
            .await
            .unwrap();
        store
            .store_weather(&weather("w1", "2023-01-31T13:45:54Z", 2.1))
            .await
            .unwrap();
        store
            .store_indoor_environment(&IndoorEnvironmentObserved {
                id: "w1".to_string(),
                temperature: 21.0,
                humidity: 40.0,
                observed_at: "2023-01-31T12:45:54Z".to_string(),
                location: Point::default(),
            })
            .await
            .unwrap();

        assert_eq!(store.len().await, 3);

        store.clear().await;
        assert!(store.is_empty().await);
        assert_eq!(store.attempts().await, 0);
    }
}
