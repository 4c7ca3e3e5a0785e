//! Mock classifier agent for integration testing
//!
//! Serves the two classifier endpoints on an ephemeral local port and records
//! every instruction it receives. A failing agent still records the request
//! before answering with an error status.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use ntnqof_ntn::{AdmissionRequest, ClassifierSide, PipeInstruction, ADMISSION_PATH, PIPE_PATH};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot, Mutex, RwLock};

/// Mock classifier errors
#[derive(Debug, Error)]
pub enum MockClassifierError {
    #[error("Bind failed: {0}")]
    BindFailed(#[from] std::io::Error),
}

/// Requests received by the mock classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockClassifierEvent {
    /// `POST /data-plane/pdu`
    Pipe(PipeInstruction),
    /// `POST /control-plane/adm`
    Admission(AdmissionRequest),
}

/// Mock classifier configuration
#[derive(Debug, Clone, Copy)]
pub struct MockClassifierConfig {
    /// Which side this agent plays
    pub side: ClassifierSide,
    /// Status returned for every request
    pub status: StatusCode,
    /// Hold every answer this long after recording the request
    pub delay: Option<Duration>,
}

impl MockClassifierConfig {
    pub fn new(side: ClassifierSide) -> Self {
        Self {
            side,
            status: StatusCode::OK,
            delay: None,
        }
    }

    /// Agent that answers every request with `500`.
    pub fn failing(mut self) -> Self {
        self.status = StatusCode::INTERNAL_SERVER_ERROR;
        self
    }

    /// Agent that records each request but answers only after `delay`.
    pub fn stalled(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    delay: Option<Duration>,
    events: Arc<RwLock<Vec<MockClassifierEvent>>>,
    event_tx: mpsc::Sender<MockClassifierEvent>,
}

impl MockState {
    async fn record(&self, event: MockClassifierEvent) -> StatusCode {
        self.events.write().await.push(event.clone());
        let _ = self.event_tx.try_send(event);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.status
    }
}

async fn pipe(State(state): State<MockState>, Json(body): Json<PipeInstruction>) -> StatusCode {
    state.record(MockClassifierEvent::Pipe(body)).await
}

async fn admission(
    State(state): State<MockState>,
    Json(body): Json<AdmissionRequest>,
) -> StatusCode {
    state.record(MockClassifierEvent::Admission(body)).await
}

/// Mock classifier agent
pub struct MockClassifier {
    config: MockClassifierConfig,
    addr: SocketAddr,
    events: Arc<RwLock<Vec<MockClassifierEvent>>>,
    event_rx: Mutex<mpsc::Receiver<MockClassifierEvent>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockClassifier {
    /// Starts a mock agent on `127.0.0.1:0`.
    pub async fn start(config: MockClassifierConfig) -> Result<Self, MockClassifierError> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let (event_tx, event_rx) = mpsc::channel(100);
        let events = Arc::new(RwLock::new(Vec::new()));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new()
            .route(PIPE_PATH, post(pipe))
            .route(ADMISSION_PATH, post(admission))
            .with_state(MockState {
                status: config.status,
                delay: config.delay,
                events: events.clone(),
                event_tx,
            });

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });
        tracing::info!("Mock classifier ({}) started on {}", config.side, addr);

        Ok(Self {
            config,
            addr,
            events,
            event_rx: Mutex::new(event_rx),
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn side(&self) -> ClassifierSide {
        self.config.side
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Waits for the next request.
    pub async fn next_event(&self) -> Option<MockClassifierEvent> {
        self.event_rx.lock().await.recv().await
    }

    /// Every request received so far.
    pub async fn events(&self) -> Vec<MockClassifierEvent> {
        self.events.read().await.clone()
    }

    /// Pipe instructions received so far.
    pub async fn pipes(&self) -> Vec<PipeInstruction> {
        self.events()
            .await
            .into_iter()
            .filter_map(|e| match e {
                MockClassifierEvent::Pipe(p) => Some(p),
                MockClassifierEvent::Admission(_) => None,
            })
            .collect()
    }

    /// Admission snapshots received so far.
    pub async fn admissions(&self) -> Vec<AdmissionRequest> {
        self.events()
            .await
            .into_iter()
            .filter_map(|e| match e {
                MockClassifierEvent::Admission(a) => Some(a),
                MockClassifierEvent::Pipe(_) => None,
            })
            .collect()
    }

    pub async fn request_count(&self) -> usize {
        self.events.read().await.len()
    }

    /// Stops serving.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Mock classifier ({}) stopped", self.config.side);
        }
    }
}

impl Drop for MockClassifier {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntnqof_ntn::{ClassifierAgent, ClassifierClient, HttpClassifierClient};
    use ntnqof_common::{ClassifierConfig, HttpClientConfig};

    fn agent_for(mock: &MockClassifier) -> ClassifierAgent {
        let cfg = ClassifierConfig {
            register_ipv4: "127.0.0.1".to_string(),
            port: mock.port(),
            ingress: vec![],
            egress: vec![],
            prefix_length: 24,
        };
        ClassifierAgent::from_config(mock.side(), &cfg).unwrap()
    }

    fn request() -> AdmissionRequest {
        AdmissionRequest {
            controls: vec![],
            slice_aware: false,
        }
    }

    #[tokio::test]
    async fn test_mock_records_admission() {
        let mock = MockClassifier::start(MockClassifierConfig::new(ClassifierSide::Cn))
            .await
            .unwrap();
        let client = HttpClassifierClient::new(&HttpClientConfig::default()).unwrap();

        client
            .admission_control(&agent_for(&mock), &request())
            .await
            .unwrap();
        assert_eq!(
            mock.next_event().await,
            Some(MockClassifierEvent::Admission(request()))
        );
        assert_eq!(mock.admissions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_mock_still_records() {
        let mock = MockClassifier::start(MockClassifierConfig::new(ClassifierSide::Ran).failing())
            .await
            .unwrap();
        let client = HttpClassifierClient::new(&HttpClientConfig::default()).unwrap();

        let err = client
            .admission_control(&agent_for(&mock), &request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
        assert_eq!(mock.request_count().await, 1);
    }
}
