// Postgres storage layer with sqlx
//
// This crate provides the database implementation of the core storage trait:
// - DbObservationStore: implements ObservationStore for observation rows
//
// Reference DDL for the three observation tables lives in sql/schema.sql.

pub mod config;
pub mod observation_store;
pub mod repositories;
pub mod statements;

pub use config::StorageConfig;
pub use observation_store::{create_db_observation_store, DbObservationStore};
pub use repositories::Database;
pub use statements::{quote_identifier, table_name, InsertStatement, SqlParam, StatementBuilder};

/// DDL for the observation tables and their `latest*` views
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");
