// Watermeter HTTP service
//
// Router assembly is kept in the library so integration tests can drive it
// with an in-memory store.

pub mod config;
pub mod notify;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Json, Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub use config::ApiConfig;
pub use notify::AppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(notify::notify, health),
    tags(
        (name = "notifications", description = "NGSI-LD notification webhook"),
        (name = "health", description = "Liveness probe")
    ),
    info(
        title = "Watermeter API",
        description = "Stores NGSI-LD observation notifications in PostGIS",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

/// GET /health - Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "health"
)]
pub async fn health() -> StatusCode {
    StatusCode::OK
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router with CORS and request tracing
pub fn router(state: AppState, cors_origins: &[HeaderValue]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api-doc/openapi.json", get(openapi_json))
        .merge(notify::routes(state))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(origins.iter().cloned())
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .allow_credentials(true)
}
