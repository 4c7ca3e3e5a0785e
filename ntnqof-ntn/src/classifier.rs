//! Classifier agent client
//!
//! Wire messages sent to the classifier agents and the client that delivers
//! them. The [`ClassifierClient`] trait is the seam between the fan-out logic
//! and the network; [`HttpClassifierClient`] is the production transport.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use ntnqof_common::{Dscp, HttpClientConfig, QofResult, SbiClient, SliceId, Teid};

use crate::resolver::ClassifierAgent;

/// Pipe provisioning path on a classifier agent.
pub const PIPE_PATH: &str = "/data-plane/pdu";

/// Admission-control path on a classifier agent.
pub const ADMISSION_PATH: &str = "/control-plane/adm";

/// One direction's provisioning instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeInstruction {
    /// Tunnel endpoint id of this direction
    pub teid: Teid,
    /// Terrestrial marking
    #[serde(rename = "dscp_5g")]
    pub dscp_5g: Dscp,
    /// Satellite marking
    pub dscp_satellite: Dscp,
    /// Satellite slice id
    pub slice_id: SliceId,
    /// UE IPv4 address
    pub ipv4: Ipv4Addr,
    /// True for the RAN-originated (return) direction
    pub is_ran: bool,
    /// Remote classifier-side tunnel address
    pub endpoint: String,
    /// Resolved local ingress address
    pub ingress: Ipv4Addr,
}

/// One slice's throughput ceiling for one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionControl {
    /// Satellite slice id
    pub slice_id: SliceId,
    /// Throughput limit
    pub throughput: u64,
    /// Classifier-side tunnel address the limit applies to
    pub endpoint: String,
}

/// Full per-slice budget snapshot pushed to one classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRequest {
    /// One entry per configured slice
    pub controls: Vec<AdmissionControl>,
    /// Whether the classifier enforces per-slice budgets
    pub slice_aware: bool,
}

/// Delivers instructions to a classifier agent.
#[async_trait]
pub trait ClassifierClient: Send + Sync {
    /// Sends one pipe instruction.
    async fn provision_pipe(
        &self,
        agent: &ClassifierAgent,
        instruction: &PipeInstruction,
    ) -> QofResult<()>;

    /// Sends one admission-control snapshot.
    async fn admission_control(
        &self,
        agent: &ClassifierAgent,
        request: &AdmissionRequest,
    ) -> QofResult<()>;
}

/// HTTP/JSON transport to the classifier agents.
#[derive(Debug, Clone)]
pub struct HttpClassifierClient {
    sbi: SbiClient,
}

impl HttpClassifierClient {
    /// Builds a client enforcing the configured timeouts.
    pub fn new(cfg: &HttpClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            sbi: SbiClient::new(cfg)?,
        })
    }

    async fn post_json<T: Serialize + Sync>(
        &self,
        agent: &ClassifierAgent,
        path: &str,
        body: &T,
    ) -> QofResult<()> {
        let label = agent.label();
        self.sbi.post_json(&agent.uri(path), &label, path, body).await?;
        info!(classifier = %label, path, "Classifier accepted request");
        Ok(())
    }
}

#[async_trait]
impl ClassifierClient for HttpClassifierClient {
    async fn provision_pipe(
        &self,
        agent: &ClassifierAgent,
        instruction: &PipeInstruction,
    ) -> QofResult<()> {
        self.post_json(agent, PIPE_PATH, instruction).await
    }

    async fn admission_control(
        &self,
        agent: &ClassifierAgent,
        request: &AdmissionRequest,
    ) -> QofResult<()> {
        self.post_json(agent, ADMISSION_PATH, request).await
    }
}
