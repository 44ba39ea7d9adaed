// Type classification
//
// Maps an entity's declared type onto a closed set of kinds. Anything the
// pipeline does not store is kept as `Unrecognized` so the orchestrator has
// to handle it explicitly.

use crate::notification::EntityStub;
use crate::observation::ObservationKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Observation(ObservationKind),
    Unrecognized(String),
}

impl EntityKind {
    /// Classify a declared type name (case-insensitive)
    pub fn classify(entity_type: &str) -> Self {
        match ObservationKind::from_type_name(entity_type) {
            Some(kind) => EntityKind::Observation(kind),
            None => EntityKind::Unrecognized(entity_type.to_string()),
        }
    }
}

impl From<&EntityStub> for EntityKind {
    fn from(stub: &EntityStub) -> Self {
        EntityKind::classify(&stub.entity_type)
    }
}
