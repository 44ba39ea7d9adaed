// Notification-to-record pipeline
//
// This crate turns NGSI-LD change notifications into observation records and
// hands them to a pluggable store. It has no knowledge of HTTP or Postgres.
//
// Key design decisions:
// - Entity payloads stay raw JSON until their declared type selects a mapper
// - Dispatch goes through a closed ObservationKind enum; unknown types are
//   an explicit EntityKind::Unrecognized and are skipped, not rejected
// - ObservationStore is the only seam; writes must be conflict-free on (id, observedAt)
// - Errors are typed per stage (DecodeError, MapError, StorageError)

pub mod classifier;
pub mod error;
pub mod mappers;
pub mod memory;
pub mod ngsi;
pub mod notification;
pub mod observation;
pub mod pipeline;
pub mod traits;

pub use classifier::EntityKind;
pub use error::{DecodeError, MapError, PipelineError, Result, StorageError, StorageResult};
pub use mappers::{map_indoor_environment, map_observation, map_water_consumption, map_weather};
pub use memory::InMemoryObservationStore;
pub use ngsi::{GeoProperty, Geometry, Property};
pub use notification::{EntityPayload, EntityStub, Notification};
pub use observation::{
    IndoorEnvironmentObserved, Observation, ObservationKind, Point, WaterConsumptionObserved,
    WeatherObserved,
};
pub use pipeline::{EntityScope, NotificationPipeline, ProcessOutcome, SkippedEntity, StoredEntity};
pub use traits::ObservationStore;
