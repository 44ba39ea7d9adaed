// Notification webhook (HTTP layer)
// Decision: 200 with an empty body on success, 500 with the error text otherwise

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;
use watermeter_core::{NotificationPipeline, PipelineError};

/// App state for the notification webhook
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<NotificationPipeline>,
}

impl AppState {
    pub fn new(pipeline: NotificationPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Create notification routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v2/notify", post(notify))
        .with_state(state)
}

/// POST /v2/notify - Receive an NGSI-LD notification
#[utoipa::path(
    post,
    path = "/v2/notify",
    request_body(content = String, description = "NGSI-LD notification", content_type = "application/json"),
    responses(
        (status = 200, description = "Notification processed"),
        (status = 500, description = "Notification could not be decoded, mapped or stored", body = String, content_type = "text/plain")
    ),
    tag = "notifications"
)]
pub async fn notify(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = Uuid::now_v7();
    let span = info_span!("notification-received", %request_id, bytes = body.len());

    async move {
        info!("processing notification");

        match state.pipeline.process_payload(&body).await {
            Ok(outcome) => {
                info!(
                    stored = outcome.stored.len(),
                    skipped = outcome.skipped.len(),
                    "notification processed"
                );
                StatusCode::OK.into_response()
            }
            Err(e) => {
                match &e {
                    PipelineError::Decode(_) => {
                        error!(error = %e, "failed to unmarshal notification")
                    }
                    _ => error!(error = %e, "failed to handle notification"),
                }
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
    .instrument(span)
    .await
}
