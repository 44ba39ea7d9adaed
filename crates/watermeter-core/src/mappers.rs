// Observation mappers
//
// Each mapper decodes an entity payload into the NGSI-LD source shape of its
// kind and flattens it into an observation record. Absent attributes are not
// errors; only type mismatches in consumed fields fail.

use serde::Deserialize;

use crate::error::MapError;
use crate::ngsi::{null_as_default, GeoProperty, Property};
use crate::notification::EntityPayload;
use crate::observation::{
    IndoorEnvironmentObserved, Observation, ObservationKind, WaterConsumptionObserved,
    WeatherObserved,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WaterConsumptionSource {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    water_consumption: Property,
    #[serde(default, deserialize_with = "null_as_default")]
    location: GeoProperty,
}

#[derive(Debug, Deserialize)]
struct IndoorEnvironmentSource {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    temperature: Property,
    #[serde(default, deserialize_with = "null_as_default")]
    humidity: Property,
    #[serde(default, deserialize_with = "null_as_default")]
    location: GeoProperty,
}

#[derive(Debug, Deserialize)]
struct WeatherSource {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    temperature: Property,
    #[serde(default, deserialize_with = "null_as_default")]
    location: GeoProperty,
}

impl From<WaterConsumptionSource> for WaterConsumptionObserved {
    fn from(src: WaterConsumptionSource) -> Self {
        Self {
            location: src.location.point(),
            id: src.id,
            value: src.water_consumption.value,
            unit_code: src.water_consumption.unit_code,
            observed_at: src.water_consumption.observed_at,
        }
    }
}

impl From<IndoorEnvironmentSource> for IndoorEnvironmentObserved {
    fn from(src: IndoorEnvironmentSource) -> Self {
        // temperature's timestamp wins, humidity's is the fallback
        let observed_at = if !src.temperature.observed_at.is_empty() {
            src.temperature.observed_at
        } else {
            src.humidity.observed_at
        };

        Self {
            location: src.location.point(),
            id: src.id,
            temperature: src.temperature.value,
            humidity: src.humidity.value,
            observed_at,
        }
    }
}

impl From<WeatherSource> for WeatherObserved {
    fn from(src: WeatherSource) -> Self {
        Self {
            location: src.location.point(),
            id: src.id,
            temperature: src.temperature.value,
            observed_at: src.temperature.observed_at,
        }
    }
}

pub fn map_water_consumption(
    payload: &EntityPayload,
) -> Result<WaterConsumptionObserved, MapError> {
    payload
        .decode::<WaterConsumptionSource>(ObservationKind::WaterConsumption)
        .map(Into::into)
}

pub fn map_indoor_environment(
    payload: &EntityPayload,
) -> Result<IndoorEnvironmentObserved, MapError> {
    payload
        .decode::<IndoorEnvironmentSource>(ObservationKind::IndoorEnvironment)
        .map(Into::into)
}

pub fn map_weather(payload: &EntityPayload) -> Result<WeatherObserved, MapError> {
    payload
        .decode::<WeatherSource>(ObservationKind::Weather)
        .map(Into::into)
}

/// Map a payload with the mapper selected by `kind`
pub fn map_observation(
    kind: ObservationKind,
    payload: &EntityPayload,
) -> Result<Observation, MapError> {
    match kind {
        ObservationKind::WaterConsumption => map_water_consumption(payload).map(Into::into),
        ObservationKind::IndoorEnvironment => map_indoor_environment(payload).map(Into::into),
        ObservationKind::Weather => map_weather(payload).map(Into::into),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Notification;
    use crate::observation::Point;
    use serde_json::json;

    const NOTIFICATIONS: &str = include_str!("../fixtures/notifications.json");

    fn fixture_entities() -> Vec<EntityPayload> {
        Notification::decode(NOTIFICATIONS.as_bytes())
            .unwrap()
            .entities
    }

    fn payload(value: serde_json::Value) -> EntityPayload {
        let body = json!({ "data": [value] }).to_string();
        Notification::decode(body.as_bytes())
            .unwrap()
            .entities
            .remove(0)
    }

    #[test]
    fn test_map_water_consumption_fixture() {
        let wco = map_water_consumption(&fixture_entities()[0]).unwrap();

        assert_eq!(wco.id, "urn:ngsi-ld:Consumer:Consumer01");
        assert_eq!(wco.value, 191051.0);
        assert_eq!(wco.unit_code, "LTR");
        assert_eq!(wco.observed_at, "2021-05-23T23:14:16.000Z");
        assert_eq!(wco.location, Point::new(-4.128871, 50.95822));
    }

    #[test]
    fn test_map_indoor_environment_fixture() {
        let ieo = map_indoor_environment(&fixture_entities()[1]).unwrap();

        assert_eq!(ieo.id, "urn:ngsi-ld:IndoorEnvironmentObserved:intern-01");
        assert_eq!(ieo.temperature, 21.4);
        assert_eq!(ieo.humidity, 21.4);
        assert_eq!(ieo.observed_at, "2023-01-31T12:45:18Z");
        assert_eq!(ieo.location, Point::new(16.0, 37.0));
    }

    #[test]
    fn test_map_weather_fixture() {
        let wo = map_weather(&fixture_entities()[2]).unwrap();

        assert_eq!(
            wo.id,
            "urn:ngsi-ld:WeatherObserved:intern-10a52aaa84c35730:2023-01-31T12:45:23.053016674Z"
        );
        assert_eq!(wo.temperature, 2.3);
        assert_eq!(wo.observed_at, "2023-01-31T12:45:54Z");
        assert_eq!(wo.location, Point::new(17.285092, 62.392013));
    }

    #[test]
    fn test_indoor_temperature_timestamp_wins() {
        let ieo = map_indoor_environment(&payload(json!({
            "id": "urn:ngsi-ld:IndoorEnvironmentObserved:1",
            "type": "IndoorEnvironmentObserved",
            "temperature": {"type": "Property", "value": 20.5, "observedAt": "T1"},
            "humidity": {"type": "Property", "value": 40.0, "observedAt": "T2"}
        })))
        .unwrap();

        assert_eq!(ieo.observed_at, "T1");
    }

    #[test]
    fn test_indoor_humidity_timestamp_is_fallback() {
        let ieo = map_indoor_environment(&payload(json!({
            "id": "urn:ngsi-ld:IndoorEnvironmentObserved:1",
            "type": "IndoorEnvironmentObserved",
            "temperature": {"type": "Property", "value": 20.5, "observedAt": ""},
            "humidity": {"type": "Property", "value": 40.0, "observedAt": "T2"}
        })))
        .unwrap();
        assert_eq!(ieo.observed_at, "T2");

        // temperature attribute absent altogether
        let ieo = map_indoor_environment(&payload(json!({
            "id": "urn:ngsi-ld:IndoorEnvironmentObserved:1",
            "type": "IndoorEnvironmentObserved",
            "humidity": {"type": "Property", "value": 40.0, "observedAt": "T2"}
        })))
        .unwrap();
        assert_eq!(ieo.observed_at, "T2");
        assert_eq!(ieo.temperature, 0.0);
    }

    #[test]
    fn test_indoor_without_timestamps_is_empty() {
        let ieo = map_indoor_environment(&payload(json!({
            "id": "urn:ngsi-ld:IndoorEnvironmentObserved:1",
            "type": "IndoorEnvironmentObserved",
            "temperature": {"type": "Property", "value": 20.5},
            "humidity": {"type": "Property", "value": 40.0}
        })))
        .unwrap();

        assert_eq!(ieo.observed_at, "");
    }

    #[test]
    fn test_missing_location_defaults_to_origin() {
        let wo = map_weather(&payload(json!({
            "id": "urn:ngsi-ld:WeatherObserved:1",
            "type": "WeatherObserved",
            "temperature": {"type": "Property", "value": -3.5, "observedAt": "2023-01-31T12:45:54Z"}
        })))
        .unwrap();

        assert_eq!(wo.location, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_short_coordinates_default_to_origin() {
        let wco = map_water_consumption(&payload(json!({
            "id": "urn:ngsi-ld:Consumer:Consumer02",
            "type": "WaterConsumptionObserved",
            "waterConsumption": {"type": "Property", "value": 12, "unitCode": "LTR", "observedAt": "T"},
            "location": {"type": "GeoProperty", "value": {"type": "Point", "coordinates": [11.97]}}
        })))
        .unwrap();

        assert_eq!(wco.location, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_observed_by_as_bare_urn_is_ignored() {
        let wco = map_water_consumption(&payload(json!({
            "id": "urn:ngsi-ld:Consumer:Consumer01",
            "type": "WaterConsumptionObserved",
            "waterConsumption": {
                "type": "Property",
                "value": 191051,
                "unitCode": "LTR",
                "observedAt": "2021-05-23T23:14:16.000Z",
                "observedBy": "urn:ngsi-ld:Device:01"
            }
        })))
        .unwrap();

        assert_eq!(wco.value, 191051.0);
        assert_eq!(wco.observed_at, "2021-05-23T23:14:16.000Z");
    }

    #[test]
    fn test_observed_by_with_multiple_objects_is_ignored() {
        let wo = map_weather(&payload(json!({
            "id": "urn:ngsi-ld:WeatherObserved:1",
            "type": "WeatherObserved",
            "temperature": {
                "type": "Property",
                "value": 2.3,
                "observedAt": "2023-01-31T12:45:54Z",
                "observedBy": {"type": "Relationship", "object": ["urn:a", "urn:b"]}
            },
            "location": {"type": "GeoProperty", "value": {"type": "Point", "coordinates": [17.0, 62.0]}}
        })))
        .unwrap();

        assert_eq!(wo.temperature, 2.3);
        assert_eq!(wo.location, Point::new(17.0, 62.0));
    }

    #[test]
    fn test_type_mismatch_is_map_error() {
        let err = map_water_consumption(&payload(json!({
            "id": "urn:ngsi-ld:Consumer:Consumer01",
            "type": "WaterConsumptionObserved",
            "waterConsumption": {"type": "Property", "value": "lots"}
        })))
        .unwrap_err();

        assert!(matches!(
            err,
            MapError::Entity {
                kind: ObservationKind::WaterConsumption,
                ..
            }
        ));
    }

    #[test]
    fn test_map_observation_dispatches_by_kind() {
        let entities = fixture_entities();

        let observation =
            map_observation(ObservationKind::IndoorEnvironment, &entities[1]).unwrap();
        assert_eq!(observation.kind(), ObservationKind::IndoorEnvironment);
        assert_eq!(
            observation.id(),
            "urn:ngsi-ld:IndoorEnvironmentObserved:intern-01"
        );
    }
}
