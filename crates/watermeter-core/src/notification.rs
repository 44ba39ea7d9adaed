// Notification envelope and entity decoder
//
// A notification is decoded structurally: unknown fields are ignored and
// missing fields take their defaults. Entities are kept as raw JSON objects
// and only decoded once their declared type has selected a mapper.

use serde::de::{self, DeserializeOwned, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

use crate::error::{DecodeError, MapError};
use crate::ngsi::null_as_default;
use crate::observation::ObservationKind;

/// NGSI-LD change notification
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    /// Always "Notification" when sent by a context broker
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub notification_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub subscription_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub notified_at: String,

    /// Entity payloads in delivery order
    #[serde(
        rename = "data",
        alias = "entities",
        default,
        deserialize_with = "null_as_default"
    )]
    pub entities: Vec<EntityPayload>,
}

impl Notification {
    /// Decode a notification from a raw request body
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A single entity kept as undecoded JSON. Always a JSON object.
#[derive(Debug, Clone)]
pub struct EntityPayload(Box<RawValue>);

impl EntityPayload {
    /// Raw JSON text of the entity
    pub fn get(&self) -> &str {
        self.0.get()
    }

    /// Read only `id` and `type`
    pub fn stub(&self) -> Result<EntityStub, MapError> {
        serde_json::from_str(self.get()).map_err(MapError::Stub)
    }

    /// Decode the full payload into the source shape of `kind`
    pub fn decode<T: DeserializeOwned>(&self, kind: ObservationKind) -> Result<T, MapError> {
        serde_json::from_str(self.get()).map_err(|e| MapError::entity(kind, e))
    }
}

impl<'de> Deserialize<'de> for EntityPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        if !raw.get().trim_start().starts_with('{') {
            return Err(de::Error::invalid_type(
                Unexpected::Other(raw.get()),
                &"an entity object",
            ));
        }
        Ok(Self(raw))
    }
}

/// The `id` and `type` of an entity, read before dispatching by declared type
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntityStub {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub entity_type: String,
}
