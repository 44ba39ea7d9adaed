// NGSI-LD source shapes
//
// These mirror the attribute layout of entities delivered by the context
// broker. Only the fields the mappers consume are declared; every other
// attribute (`observedBy`, `datasetId`, geometry `type`, ...) is skipped
// without looking at its shape.

use serde::{Deserialize, Deserializer};

use crate::observation::Point;

/// Deserialize `null` as the type default, so it behaves like an absent field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A numeric NGSI-LD Property
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_code: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub observed_at: String,
}

/// An NGSI-LD GeoProperty holding a GeoJSON geometry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeoProperty {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: Geometry,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Geometry {
    /// `[longitude, latitude]` for a GeoJSON Point
    #[serde(default, deserialize_with = "null_as_default")]
    pub coordinates: Vec<f64>,
}

impl GeoProperty {
    pub fn point(&self) -> Point {
        Point::from_coordinates(&self.value.coordinates)
    }
}
