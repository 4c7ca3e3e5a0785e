//! NTN-QoF service-based interface
//!
//! Axum router for the two session endpoints and the health probe. Handlers
//! stay thin: decode, call the engine, map the outcome to a status code.

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, warn};

use ntnqof_common::{
    log_sbi_message, ControlPlane, Direction, ErrorKind, NtnSession, QofError, SbiMessage,
    NTN_ADMISSION_CONTROL_PATH, NTN_NEW_SESSION_PATH,
};

use crate::admission::AdmissionBroadcaster;
use crate::classifier::ClassifierClient;
use crate::context::NtnContext;
use crate::provision::{FanOutReport, Leg, LegReport, Provisioner};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<NtnContext>,
    pub provisioner: Provisioner,
    pub admission: AdmissionBroadcaster,
}

impl AppState {
    pub fn new(ctx: Arc<NtnContext>, client: Arc<dyn ClassifierClient>) -> Self {
        Self {
            provisioner: Provisioner::new(ctx.clone(), client.clone()),
            admission: AdmissionBroadcaster::new(ctx.clone(), client),
            ctx,
        }
    }
}

/// Per-leg entry of a fan-out response.
#[derive(Debug, Serialize)]
struct LegStatus {
    leg: Leg,
    classifier: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl From<&LegReport> for LegStatus {
    fn from(report: &LegReport) -> Self {
        let (status, kind, message) = match &report.outcome {
            Ok(()) => ("ok", None, None),
            Err(e) => ("failed", Some(e.kind()), Some(e.to_string())),
        };
        Self {
            leg: report.leg,
            classifier: report.side().to_string(),
            status,
            kind,
            message,
        }
    }
}

fn leg_statuses(report: &FanOutReport) -> Vec<LegStatus> {
    report.legs().into_iter().map(LegStatus::from).collect()
}

/// Handler failure.
#[derive(Debug)]
pub enum ApiError {
    /// Request rejected before any classifier call
    Rejected(QofError),
    /// At least one leg failed
    Partial(FanOutReport),
}

impl ApiError {
    fn status_for(kind: ErrorKind) -> StatusCode {
        match kind {
            ErrorKind::MalformedRequest => StatusCode::BAD_REQUEST,
            ErrorKind::TranslationNotFound => StatusCode::NOT_FOUND,
            ErrorKind::ConfigurationMissing => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::AddressResolutionFailure => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::RemoteProvisioningFailure => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<QofError> for ApiError {
    fn from(e: QofError) -> Self {
        ApiError::Rejected(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(QofError::MalformedRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Rejected(e) => {
                let body = json!({
                    "error": { "kind": e.kind(), "message": e.to_string() }
                });
                (Self::status_for(e.kind()), Json(body)).into_response()
            }
            ApiError::Partial(report) => {
                let failed: Vec<String> = report
                    .failed_legs()
                    .iter()
                    .map(|l| l.leg.to_string())
                    .collect();
                let kind = crate::provision::first_failure(&report)
                    .map(QofError::kind)
                    .unwrap_or(ErrorKind::RemoteProvisioningFailure);
                let body = json!({
                    "error": {
                        "kind": kind,
                        "message": format!("partial failure on leg(s): {}", failed.join(", ")),
                    },
                    "legs": leg_statuses(&report),
                });
                (Self::status_for(kind), Json(body)).into_response()
            }
        }
    }
}

fn fan_out_response(report: FanOutReport) -> Result<Response, ApiError> {
    if !report.is_success() {
        return Err(ApiError::Partial(report));
    }
    let body = json!({
        "message": SbiMessage::success().message,
        "legs": leg_statuses(&report),
    });
    Ok((StatusCode::OK, Json(body)).into_response())
}

async fn new_session(
    State(state): State<AppState>,
    payload: Result<Json<NtnSession>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(session) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected new-session request");
        ApiError::from(rejection)
    })?;
    info!(
        slice_id = session.id,
        ran = %session.ran,
        upf = %session.upf,
        ue = %session.ipv4,
        "New NTN session"
    );

    let report = state.provisioner.provision_session(&session).await?;
    fan_out_response(report)
}

async fn admission_control(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let text = String::from_utf8_lossy(&body);
    log_sbi_message(Direction::Rx, "qof", NTN_ADMISSION_CONTROL_PATH, &text);

    let trigger = if text.trim().is_empty() {
        None
    } else {
        let cp: ControlPlane = serde_json::from_slice(&body)
            .map_err(|e| QofError::MalformedRequest(e.to_string()))?;
        Some(cp)
    };

    let report = state.admission.broadcast(trigger.as_ref()).await;
    fan_out_response(report)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "name": state.ctx.name }))
}

/// Builds the NTN-QoF router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(NTN_NEW_SESSION_PATH, post(new_session))
        .route(NTN_ADMISSION_CONTROL_PATH, post(admission_control))
        .route("/health", get(health))
        .with_state(state)
}

/// Serves `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "NTN-QoF SBI listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
