// Observation records
//
// Typed, storage-ready representation of the supported entity kinds.
// Records are plain values owned by the pipeline invocation that built them.

use std::fmt;

use serde::Serialize;

/// Geographic point in WGS84
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
}

impl Point {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Build from GeoJSON ordinates `[longitude, latitude, ..]`.
    /// Fewer than two ordinates yields `(0.0, 0.0)`.
    pub fn from_coordinates(coordinates: &[f64]) -> Self {
        match coordinates {
            [longitude, latitude, ..] => Self::new(*longitude, *latitude),
            _ => Self::default(),
        }
    }
}

/// The supported observation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ObservationKind {
    WaterConsumption,
    IndoorEnvironment,
    Weather,
}

impl ObservationKind {
    pub const ALL: [ObservationKind; 3] = [
        ObservationKind::WaterConsumption,
        ObservationKind::IndoorEnvironment,
        ObservationKind::Weather,
    ];

    /// NGSI-LD entity type name
    pub fn type_name(&self) -> &'static str {
        match self {
            ObservationKind::WaterConsumption => "WaterConsumptionObserved",
            ObservationKind::IndoorEnvironment => "IndoorEnvironmentObserved",
            ObservationKind::Weather => "WeatherObserved",
        }
    }

    /// Case-insensitive lookup by NGSI-LD entity type name
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name().eq_ignore_ascii_case(type_name))
    }
}

impl fmt::Display for ObservationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterConsumptionObserved {
    pub id: String,
    pub value: f64,
    pub unit_code: String,
    pub observed_at: String,
    pub location: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndoorEnvironmentObserved {
    pub id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub observed_at: String,
    pub location: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObserved {
    pub id: String,
    pub temperature: f64,
    pub observed_at: String,
    pub location: Point,
}

/// One decoded observation, ready for storage
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Observation {
    WaterConsumption(WaterConsumptionObserved),
    IndoorEnvironment(IndoorEnvironmentObserved),
    Weather(WeatherObserved),
}

impl Observation {
    pub fn kind(&self) -> ObservationKind {
        match self {
            Observation::WaterConsumption(_) => ObservationKind::WaterConsumption,
            Observation::IndoorEnvironment(_) => ObservationKind::IndoorEnvironment,
            Observation::Weather(_) => ObservationKind::Weather,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Observation::WaterConsumption(o) => &o.id,
            Observation::IndoorEnvironment(o) => &o.id,
            Observation::Weather(o) => &o.id,
        }
    }

    pub fn observed_at(&self) -> &str {
        match self {
            Observation::WaterConsumption(o) => &o.observed_at,
            Observation::IndoorEnvironment(o) => &o.observed_at,
            Observation::Weather(o) => &o.observed_at,
        }
    }

    pub fn location(&self) -> Point {
        match self {
            Observation::WaterConsumption(o) => o.location,
            Observation::IndoorEnvironment(o) => o.location,
            Observation::Weather(o) => o.location,
        }
    }
}

impl From<WaterConsumptionObserved> for Observation {
    fn from(o: WaterConsumptionObserved) -> Self {
        Observation::WaterConsumption(o)
    }
}

impl From<IndoorEnvironmentObserved> for Observation {
    fn from(o: IndoorEnvironmentObserved) -> Self {
        Observation::IndoorEnvironment(o)
    }
}

impl From<WeatherObserved> for Observation {
    fn from(o: WeatherObserved) -> Self {
        Observation::Weather(o)
    }
}
