//! Session relay to the NTN-QoF
//!
//! Turns the SMF's per-session info into an [`NtnSession`]: the S-NSSAI picks
//! the terrestrial slice (and with it the RAN/UPF tunnel addresses and the
//! satellite slice id), the 5QI picks the DSCP. The result is posted once to
//! the NTN-QoF.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use ntnqof_common::{
    ControlPlane, HttpClientConfig, NtnSession, QofResult, QofSessionInfo, QosMatch, SbiClient,
    SliceMatch, NTN_ADMISSION_CONTROL_PATH, NTN_NEW_SESSION_PATH,
};

use crate::context::QofContext;

const NTN_PEER: &str = "ntn-qof";

/// Delivers requests to the NTN-QoF.
#[async_trait]
pub trait NtnSessionClient: Send + Sync {
    /// Posts a bridged session.
    async fn create_session(&self, session: &NtnSession) -> QofResult<()>;

    /// Posts an admission-control trigger.
    async fn admission_control(&self, trigger: &ControlPlane) -> QofResult<()>;
}

/// HTTP/JSON transport to the NTN-QoF.
#[derive(Debug, Clone)]
pub struct HttpNtnClient {
    sbi: SbiClient,
    ctx: Arc<QofContext>,
}

impl HttpNtnClient {
    pub fn new(ctx: Arc<QofContext>, cfg: &HttpClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            sbi: SbiClient::new(cfg)?,
            ctx,
        })
    }

    async fn post_json<T: Serialize + Sync>(&self, path: &str, body: &T) -> QofResult<()> {
        let target = self.ctx.ntn_url(path);
        self.sbi.post_json(&target, NTN_PEER, path, body).await?;
        Ok(())
    }
}

#[async_trait]
impl NtnSessionClient for HttpNtnClient {
    async fn create_session(&self, session: &NtnSession) -> QofResult<()> {
        self.post_json(NTN_NEW_SESSION_PATH, session).await
    }

    async fn admission_control(&self, trigger: &ControlPlane) -> QofResult<()> {
        self.post_json(NTN_ADMISSION_CONTROL_PATH, trigger).await
    }
}

/// Translates SMF session info and forwards it to the NTN-QoF.
#[derive(Clone)]
pub struct SessionRelay {
    ctx: Arc<QofContext>,
    client: Arc<dyn NtnSessionClient>,
}

impl SessionRelay {
    pub fn new(ctx: Arc<QofContext>, client: Arc<dyn NtnSessionClient>) -> Self {
        Self { ctx, client }
    }

    /// Builds the bridged session for `info` without sending it.
    pub fn translate(&self, info: &QofSessionInfo) -> QofResult<NtnSession> {
        let slice = self.ctx.resolve_snssai(&info.snssai)?;
        let dscp = self.ctx.translate_5qi(info.five_qi)?;
        Ok(NtnSession {
            ran: slice.ran,
            upf: slice.cn,
            slice_match: SliceMatch {
                uteid: info.uteid,
                dteid: info.dteid,
            },
            qos_match: QosMatch { dscp },
            id: slice.id,
            ipv4: info.ipv4,
        })
    }

    /// Translates `info` and posts it once. Nothing is sent when either
    /// lookup misses.
    pub async fn relay_session(&self, info: &QofSessionInfo) -> QofResult<NtnSession> {
        let session = self.translate(info)?;
        info!(
            supi = %info.supi,
            snssai = %info.snssai,
            five_qi = info.five_qi,
            slice_id = session.id,
            dscp = session.qos_match.dscp,
            "Relaying session to NTN-QoF"
        );
        self.client.create_session(&session).await?;
        Ok(session)
    }

    /// Announces the default slice, if one is configured.
    ///
    /// Returns whether an announcement was accepted. Failure is logged and
    /// does not stop the QoF.
    pub async fn announce_default_slice(&self) -> bool {
        let Some(slice) = self.ctx.default_slice() else {
            return false;
        };
        let trigger = ControlPlane {
            ran: slice.ran.to_string(),
            cn: slice.amf.clone().unwrap_or_else(|| slice.cn.to_string()),
            id: slice.id,
        };
        match self.client.admission_control(&trigger).await {
            Ok(()) => {
                info!(slice_id = slice.id, snssai = %slice.snssai, "Default slice announced");
                true
            }
            Err(e) => {
                warn!(slice_id = slice.id, error = %e, "Default slice announcement failed");
                false
            }
        }
    }
}
