// HTTP service configuration loaded from environment variables.
// Decision: Without CORS_ALLOWED_ORIGINS the request origin is mirrored (credentials allowed)
// Decision: NOTIFY_FIRST_ENTITY_ONLY opts back into single-entity notifications

use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;
use watermeter_core::EntityScope;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    /// Allowed CORS origins; empty mirrors any origin
    pub cors_origins: Vec<HeaderValue>,
    pub entity_scope: EntityScope,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
            entity_scope: EntityScope::All,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match var("SERVICE_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("SERVICE_PORT is not a valid port: {port}"))?,
            None => defaults.port,
        };

        // Example: CORS_ALLOWED_ORIGINS="https://maps.example.com,https://admin.example.com"
        let cors_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .filter_map(|s| s.trim().parse().ok())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        let entity_scope = match var("NOTIFY_FIRST_ENTITY_ONLY")
            .map(|s| s.trim().to_lowercase())
            .as_deref()
        {
            None => defaults.entity_scope,
            Some("false") | Some("0") => EntityScope::All,
            Some("true") | Some("1") => EntityScope::FirstOnly,
            Some(other) => bail!("NOTIFY_FIRST_ENTITY_ONLY must be true or false, got {other}"),
        };

        Ok(Self {
            port,
            cors_origins,
            entity_scope,
        })
    }
}
