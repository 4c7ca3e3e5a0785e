//! QoF service-based interface

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, warn};

use ntnqof_common::{ErrorKind, QofError, QofSessionInfo, SbiMessage, QOF_NEW_SESSION_PATH};

use crate::context::QofContext;
use crate::relay::SessionRelay;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<QofContext>,
    pub relay: SessionRelay,
}

/// Handler failure, rendered as `{"error": {"kind", "message"}}`.
#[derive(Debug)]
pub struct ApiError(pub QofError);

impl From<QofError> for ApiError {
    fn from(e: QofError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::MalformedRequest => StatusCode::BAD_REQUEST,
            ErrorKind::TranslationNotFound => StatusCode::NOT_FOUND,
            ErrorKind::ConfigurationMissing => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::AddressResolutionFailure => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::RemoteProvisioningFailure => StatusCode::BAD_GATEWAY,
        };
        let body = json!({ "error": { "kind": kind, "message": self.0.to_string() } });
        (status, Json(body)).into_response()
    }
}

async fn new_session(
    State(state): State<AppState>,
    payload: Result<Json<QofSessionInfo>, JsonRejection>,
) -> Result<Json<SbiMessage>, ApiError> {
    let Json(info) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected session info");
        QofError::MalformedRequest(rejection.body_text())
    })?;
    info!(session_id = info.session_id, supi = %info.supi, "Session info from SMF");

    state.relay.relay_session(&info).await.map_err(|e| {
        warn!(session_id = info.session_id, error = %e, "Session relay failed");
        ApiError(e)
    })?;
    Ok(Json(SbiMessage::success()))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "name": state.ctx.name }))
}

/// Builds the QoF router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(QOF_NEW_SESSION_PATH, post(new_session))
        .route("/health", get(health))
        .with_state(state)
}

/// Serves `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "QoF SBI listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
