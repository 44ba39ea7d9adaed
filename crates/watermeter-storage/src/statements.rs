// Insert statements per observation kind
//
// Every value travels as a bound parameter. The schema is the only
// configurable part of the statement text; it is folded to lower case the way
// Postgres folds the unquoted name in the DDL, then quoted as an identifier. Rows are keyed by ("id", "observedAt"); a duplicate key makes
// the insert a no-op.

use watermeter_core::{
    IndoorEnvironmentObserved, ObservationKind, WaterConsumptionObserved, WeatherObserved,
};

/// WGS84
pub const SRID: i32 = 4326;

/// A bound statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Float(f64),
}

/// Statement text plus its positional parameters ($1, $2, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// Quote a Postgres identifier, doubling embedded quotes
pub fn quote_identifier(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Table name for a kind, unquoted so it folds like the DDL
pub fn table_name(kind: ObservationKind) -> &'static str {
    match kind {
        ObservationKind::WaterConsumption => "waterConsumptionObserved",
        ObservationKind::IndoorEnvironment => "indoorEnvironmentObserved",
        ObservationKind::Weather => "weatherObserved",
    }
}

/// Builds the insert statements for one schema and source label
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    source_label: String,
    water_consumption_sql: String,
    indoor_environment_sql: String,
    weather_sql: String,
}

impl StatementBuilder {
    pub fn new(schema: &str, source_label: impl Into<String>) -> Self {
        let schema = quote_identifier(&schema.to_lowercase());
        let table = |kind| format!("{}.{}", schema, table_name(kind));

        let water_consumption_sql = format!(
            r#"INSERT INTO {} ("id", "waterConsumption", "unitCode", "observedAt", "location", "source", "createdAt")
VALUES ($1, $2, $3, $4::text::timestamp, ST_SetSRID(ST_MakePoint($5, $6), {SRID}), $7, now())
ON CONFLICT DO NOTHING"#,
            table(ObservationKind::WaterConsumption)
        );

        let indoor_environment_sql = format!(
            r#"INSERT INTO {} ("id", "temperature", "humidity", "observedAt", "location", "source", "createdAt")
VALUES ($1, $2, $3, $4::text::timestamp, ST_SetSRID(ST_MakePoint($5, $6), {SRID}), $7, now())
ON CONFLICT DO NOTHING"#,
            table(ObservationKind::IndoorEnvironment)
        );

        let weather_sql = format!(
            r#"INSERT INTO {} ("id", "temperature", "observedAt", "location", "source", "createdAt")
VALUES ($1, $2, $3::text::timestamp, ST_SetSRID(ST_MakePoint($4, $5), {SRID}), $6, now())
ON CONFLICT DO NOTHING"#,
            table(ObservationKind::Weather)
        );

        Self {
            source_label: source_label.into(),
            water_consumption_sql,
            indoor_environment_sql,
            weather_sql,
        }
    }

    pub fn water_consumption(&self, record: &WaterConsumptionObserved) -> InsertStatement {
        InsertStatement {
            sql: self.water_consumption_sql.clone(),
            params: vec![
                SqlParam::Text(record.id.clone()),
                SqlParam::Float(record.value),
                SqlParam::Text(record.unit_code.clone()),
                SqlParam::Text(record.observed_at.clone()),
                SqlParam::Float(record.location.longitude),
                SqlParam::Float(record.location.latitude),
                SqlParam::Text(self.source_label.clone()),
            ],
        }
    }

    pub fn indoor_environment(&self, record: &IndoorEnvironmentObserved) -> InsertStatement {
        InsertStatement {
            sql: self.indoor_environment_sql.clone(),
            params: vec![
                SqlParam::Text(record.id.clone()),
                SqlParam::Float(record.temperature),
                SqlParam::Float(record.humidity),
                SqlParam::Text(record.observed_at.clone()),
                SqlParam::Float(record.location.longitude),
                SqlParam::Float(record.location.latitude),
                SqlParam::Text(self.source_label.clone()),
            ],
        }
    }

    pub fn weather(&self, record: &WeatherObserved) -> InsertStatement {
        InsertStatement {
            sql: self.weather_sql.clone(),
            params: vec![
                SqlParam::Text(record.id.clone()),
                SqlParam::Float(record.temperature),
                SqlParam::Text(record.observed_at.clone()),
                SqlParam::Float(record.location.longitude),
                SqlParam::Float(record.location.latitude),
                SqlParam::Text(self.source_label.clone()),
            ],
        }
    }
}
