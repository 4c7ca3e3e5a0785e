//! Provisioning fan-out
//!
//! A bridged session becomes two pipe instructions, one per classifier
//! agent. Forward (core to RAN) goes to the CN classifier keyed by the
//! downlink TEID; return (RAN to core) goes to the RAN classifier keyed by the
//! uplink TEID. Both legs run concurrently and both always report, so a
//! failure on one side never hides the outcome of the other.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use ntnqof_common::{Dscp, NtnSession, QofError, QofResult};

use crate::classifier::{ClassifierClient, PipeInstruction};
use crate::context::NtnContext;
use crate::resolver::{ClassifierAgent, ClassifierSide};
use crate::translate::SliceRecord;

/// Traffic direction over the satellite link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Leg {
    /// Core to RAN
    Forward,
    /// RAN to core
    Return,
}

impl Leg {
    /// Classifier agent that carries this leg.
    pub fn side(self) -> ClassifierSide {
        match self {
            Leg::Forward => ClassifierSide::Cn,
            Leg::Return => ClassifierSide::Ran,
        }
    }

    pub fn is_ran(self) -> bool {
        self.side() == ClassifierSide::Ran
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Forward => write!(f, "forward"),
            Leg::Return => write!(f, "return"),
        }
    }
}

/// Outcome of one leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegReport {
    pub leg: Leg,
    pub outcome: QofResult<()>,
}

impl LegReport {
    pub fn side(&self) -> ClassifierSide {
        self.leg.side()
    }
}

/// Outcome of both legs of a fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutReport {
    pub forward: LegReport,
    pub return_leg: LegReport,
}

impl FanOutReport {
    /// True only if both legs succeeded.
    pub fn is_success(&self) -> bool {
        self.forward.outcome.is_ok() && self.return_leg.outcome.is_ok()
    }

    /// Legs that failed, forward first.
    pub fn failed_legs(&self) -> Vec<&LegReport> {
        self.legs().into_iter().filter(|l| l.outcome.is_err()).collect()
    }

    /// Both legs, forward first.
    pub fn legs(&self) -> [&LegReport; 2] {
        [&self.forward, &self.return_leg]
    }
}

/// Builds the instruction for `leg` of `session`.
///
/// The ingress address is resolved on the leg's own classifier from the
/// session address on that side: UPF for forward, gNB for return.
pub fn pipe_instruction(
    leg: Leg,
    agent: &ClassifierAgent,
    session: &NtnSession,
    slice: &SliceRecord,
    dscp_satellite: Dscp,
) -> QofResult<PipeInstruction> {
    let (teid, side_ip, endpoint) = match leg {
        Leg::Forward => (session.slice_match.dteid, session.upf, &slice.cn_endpoint),
        Leg::Return => (session.slice_match.uteid, session.ran, &slice.ran_endpoint),
    };
    let ingress = agent.resolve_ingress(side_ip)?;

    Ok(PipeInstruction {
        teid,
        dscp_5g: session.qos_match.dscp,
        dscp_satellite,
        slice_id: slice.slice_id,
        ipv4: session.ipv4,
        is_ran: leg.is_ran(),
        endpoint: endpoint.clone(),
        ingress,
    })
}

/// Turns bridged sessions into classifier pipe instructions.
#[derive(Clone)]
pub struct Provisioner {
    ctx: Arc<NtnContext>,
    client: Arc<dyn ClassifierClient>,
}

impl Provisioner {
    pub fn new(ctx: Arc<NtnContext>, client: Arc<dyn ClassifierClient>) -> Self {
        Self { ctx, client }
    }

    /// Provisions both legs of `session`.
    ///
    /// Slice and QoS lookups fail the request before anything is sent. Past
    /// that point each leg is independent and the report carries both
    /// outcomes.
    pub async fn provision_session(&self, session: &NtnSession) -> QofResult<FanOutReport> {
        let slice = self.ctx.slices.resolve(session.id)?;
        let dscp_satellite = self.ctx.qos.translate(session.qos_match.dscp)?;
        debug!(
            slice_id = slice.slice_id,
            dscp_5g = session.qos_match.dscp,
            dscp_satellite,
            "Session translated"
        );

        let (forward, return_leg) = tokio::join!(
            self.run_pipe_leg(Leg::Forward, session, slice, dscp_satellite),
            self.run_pipe_leg(Leg::Return, session, slice, dscp_satellite),
        );
        let report = FanOutReport { forward, return_leg };

        if report.is_success() {
            info!(
                slice_id = session.id,
                ue = %session.ipv4,
                "Session provisioned on both classifiers"
            );
        }
        Ok(report)
    }

    async fn run_pipe_leg(
        &self,
        leg: Leg,
        session: &NtnSession,
        slice: &SliceRecord,
        dscp_satellite: Dscp,
    ) -> LegReport {
        let agent = self.ctx.classifier(leg.side());
        let outcome = match pipe_instruction(leg, agent, session, slice, dscp_satellite) {
            Ok(instruction) => self.client.provision_pipe(agent, &instruction).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &outcome {
            warn!(%leg, classifier = %agent.label(), error = %e, "Pipe provisioning failed");
        }
        LegReport { leg, outcome }
    }
}

/// Flattens a report into a single error when any leg failed.
pub fn first_failure(report: &FanOutReport) -> Option<&QofError> {
    report
        .legs()
        .into_iter()
        .find_map(|l| l.outcome.as_ref().err())
}
