//! Mock NTN-QoF for QoF integration testing
//!
//! Accepts the two NTN-QoF session endpoints on an ephemeral port and records
//! what the QoF sends.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use ntnqof_common::{
    ControlPlane, NtnSession, SbiMessage, NTN_ADMISSION_CONTROL_PATH, NTN_NEW_SESSION_PATH,
};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, RwLock};

/// Requests received by the mock NTN-QoF
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockNtnEvent {
    NewSession(NtnSession),
    AdmissionControl(ControlPlane),
}

type Events = Arc<RwLock<Vec<MockNtnEvent>>>;

async fn new_session(State(events): State<Events>, Json(s): Json<NtnSession>) -> Json<SbiMessage> {
    events.write().await.push(MockNtnEvent::NewSession(s));
    Json(SbiMessage::success())
}

async fn admission(State(events): State<Events>, Json(cp): Json<ControlPlane>) -> Json<SbiMessage> {
    events.write().await.push(MockNtnEvent::AdmissionControl(cp));
    Json(SbiMessage::success())
}

/// Mock NTN-QoF
pub struct MockNtn {
    addr: SocketAddr,
    events: Events,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockNtn {
    /// Starts the mock on `127.0.0.1:0`.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let events: Events = Arc::default();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new()
            .route(NTN_NEW_SESSION_PATH, post(new_session))
            .route(NTN_ADMISSION_CONTROL_PATH, post(admission))
            .with_state(events.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });
        tracing::info!("Mock NTN-QoF started on {}", addr);

        Ok(Self {
            addr,
            events,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// `http://127.0.0.1:{port}`
    pub fn uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn events(&self) -> Vec<MockNtnEvent> {
        self.events.read().await.clone()
    }

    pub async fn sessions(&self) -> Vec<NtnSession> {
        self.events()
            .await
            .into_iter()
            .filter_map(|e| match e {
                MockNtnEvent::NewSession(s) => Some(s),
                MockNtnEvent::AdmissionControl(_) => None,
            })
            .collect()
    }
}

impl Drop for MockNtn {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
