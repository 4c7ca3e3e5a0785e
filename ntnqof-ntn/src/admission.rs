//! Admission-control broadcast
//!
//! On trigger, every classifier receives the full per-slice budget table for
//! the direction it carries: the CN classifier gets forward budgets against
//! the CN endpoints, the RAN classifier gets return budgets against the RAN
//! endpoints. The two sends are concurrent and independent.

use std::sync::Arc;

use tracing::{info, warn};

use ntnqof_common::ControlPlane;

use crate::classifier::{AdmissionControl, AdmissionRequest, ClassifierClient};
use crate::context::NtnContext;
use crate::provision::{FanOutReport, Leg, LegReport};

/// Budget snapshots for the `(ran, cn)` classifiers.
pub fn admission_requests(ctx: &NtnContext) -> (AdmissionRequest, AdmissionRequest) {
    let ran = ctx
        .slices
        .iter()
        .map(|s| AdmissionControl {
            slice_id: s.slice_id,
            throughput: s.return_budget,
            endpoint: s.ran_endpoint.clone(),
        })
        .collect();
    let cn = ctx
        .slices
        .iter()
        .map(|s| AdmissionControl {
            slice_id: s.slice_id,
            throughput: s.forward_budget,
            endpoint: s.cn_endpoint.clone(),
        })
        .collect();

    (
        AdmissionRequest {
            controls: ran,
            slice_aware: ctx.slice_aware,
        },
        AdmissionRequest {
            controls: cn,
            slice_aware: ctx.slice_aware,
        },
    )
}

/// Pushes slice budgets to both classifiers.
#[derive(Clone)]
pub struct AdmissionBroadcaster {
    ctx: Arc<NtnContext>,
    client: Arc<dyn ClassifierClient>,
}

impl AdmissionBroadcaster {
    pub fn new(ctx: Arc<NtnContext>, client: Arc<dyn ClassifierClient>) -> Self {
        Self { ctx, client }
    }

    /// Sends the budget table to both classifiers.
    ///
    /// The trigger body is informational; budgets always come from the
    /// configured slice table.
    pub async fn broadcast(&self, trigger: Option<&ControlPlane>) -> FanOutReport {
        match trigger {
            Some(cp) => info!(
                slice_id = cp.id,
                ran = %cp.ran,
                cn = %cp.cn,
                "Admission control triggered"
            ),
            None => info!("Admission control triggered"),
        }

        let (ran_req, cn_req) = admission_requests(&self.ctx);
        let (forward, return_leg) = tokio::join!(
            self.send(Leg::Forward, &cn_req),
            self.send(Leg::Return, &ran_req),
        );
        FanOutReport { forward, return_leg }
    }

    async fn send(&self, leg: Leg, request: &AdmissionRequest) -> LegReport {
        let agent = self.ctx.classifier(leg.side());
        let outcome = self.client.admission_control(agent, request).await;
        match &outcome {
            Ok(()) => info!(
                classifier = %agent.label(),
                slices = request.controls.len(),
                "Admission control applied"
            ),
            Err(e) => warn!(classifier = %agent.label(), error = %e, "Admission control failed"),
        }
        LegReport { leg, outcome }
    }
}
