// Error types for the notification pipeline

use std::time::Duration;

use thiserror::Error;

use crate::observation::ObservationKind;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// The notification envelope is not well-formed; none of its entities are processed
#[derive(Debug, Error)]
#[error("failed to decode notification: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// An entity payload could not be decoded
#[derive(Debug, Error)]
pub enum MapError {
    /// Reading `id`/`type` itself failed
    #[error("failed to read id and type of notification entity: {0}")]
    Stub(#[source] serde_json::Error),

    /// The payload does not match the shape of its declared kind
    #[error("failed to unmarshal notification entity into {kind}: {source}")]
    Entity {
        kind: ObservationKind,
        #[source]
        source: serde_json::Error,
    },
}

impl MapError {
    pub fn entity(kind: ObservationKind, source: serde_json::Error) -> Self {
        MapError::Entity { kind, source }
    }
}

/// Errors raised by an `ObservationStore`
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying store rejected or could not execute the statement
    #[error("{0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The statement did not complete before its deadline
    #[error("statement timed out after {0:?}")]
    Timeout(Duration),

    /// Storage configuration is unusable
    #[error("invalid storage configuration: {0}")]
    Config(String),
}

impl StorageError {
    /// Wrap a driver error without altering its message
    pub fn database(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StorageError::Database(err.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        StorageError::Config(msg.into())
    }
}

/// Any failure surfaced by the pipeline to its caller
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
