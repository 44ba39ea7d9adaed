// Pipeline orchestrator
//
// Decoder -> classifier -> mapper -> store, one entity at a time in delivery
// order. The first hard failure is returned and later entities are left
// untouched. Unrecognised entity types are skipped, not rejected.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::classifier::EntityKind;
use crate::error::Result;
use crate::mappers::map_observation;
use crate::notification::{EntityPayload, Notification};
use crate::observation::ObservationKind;
use crate::traits::ObservationStore;

/// Which entities of a notification are processed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntityScope {
    /// Every entity, in order
    #[default]
    All,
    /// Only the first entity (legacy single-entity behaviour)
    FirstOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredEntity {
    pub id: String,
    pub kind: ObservationKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEntity {
    pub id: String,
    pub declared_type: String,
}

/// Result of a successfully processed notification
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessOutcome {
    pub stored: Vec<StoredEntity>,
    pub skipped: Vec<SkippedEntity>,
}

enum EntityOutcome {
    Stored(StoredEntity),
    Skipped(SkippedEntity),
}

/// Turns notifications into stored observation rows
#[derive(Clone)]
pub struct NotificationPipeline {
    store: Arc<dyn ObservationStore>,
    scope: EntityScope,
}

impl NotificationPipeline {
    pub fn new(store: Arc<dyn ObservationStore>) -> Self {
        Self {
            store,
            scope: EntityScope::default(),
        }
    }

    pub fn with_scope(mut self, scope: EntityScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn scope(&self) -> EntityScope {
        self.scope
    }

    /// Decode a raw request body and process it
    pub async fn process_payload(&self, body: &[u8]) -> Result<ProcessOutcome> {
        let notification = Notification::decode(body)?;
        self.process(&notification).await
    }

    /// Process the entities of a decoded notification
    #[instrument(skip_all, fields(notification_id = %notification.id, entities = notification.entities.len()))]
    pub async fn process(&self, notification: &Notification) -> Result<ProcessOutcome> {
        let limit = match self.scope {
            EntityScope::All => notification.entities.len(),
            EntityScope::FirstOnly => 1,
        };

        let mut outcome = ProcessOutcome::default();
        for payload in notification.entities.iter().take(limit) {
            match self.process_entity(payload).await? {
                EntityOutcome::Stored(stored) => outcome.stored.push(stored),
                EntityOutcome::Skipped(skipped) => outcome.skipped.push(skipped),
            }
        }

        info!(
            stored = outcome.stored.len(),
            skipped = outcome.skipped.len(),
            "notification processed"
        );
        Ok(outcome)
    }

    async fn process_entity(&self, payload: &EntityPayload) -> Result<EntityOutcome> {
        let stub = payload.stub()?;

        let kind = match EntityKind::from(&stub) {
            EntityKind::Observation(kind) => kind,
            EntityKind::Unrecognized(declared_type) => {
                debug!(entity_id = %stub.id, entity_type = %declared_type, "skipping unsupported entity type");
                return Ok(EntityOutcome::Skipped(SkippedEntity {
                    id: stub.id,
                    declared_type,
                }));
            }
        };

        debug!(entity_id = %stub.id, entity_type = %kind, "handle entity");

        let observation = map_observation(kind, payload).inspect_err(|e| {
            warn!(entity_id = %stub.id, error = %e, "failed to map entity");
        })?;

        self.store.store(&observation).await.inspect_err(|e| {
            warn!(entity_id = %stub.id, entity_type = %kind, error = %e, "failed to store observation");
        })?;

        Ok(EntityOutcome::Stored(StoredEntity {
            id: observation.id().to_string(),
            kind,
        }))
    }
}
