//! Test fixtures and configuration helpers
//!
//! One reference deployment shared by the scenarios:
//!
//! - satellite slice 1: RAN endpoint `A`, CN endpoint `B`, forward 100,
//!   return 50; QoS `{5: 7}`
//! - gNB at 10.0.0.1, UPF at 10.1.0.1; RAN classifier ingress 10.0.0.254,
//!   CN classifier ingress 10.1.0.254
//! - terrestrial S-NSSAI 1-010203 maps to slice 1, 5QI 9 marks DSCP 5

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use ntnqof_common::{NtnConfig, QofConfig, QofSessionInfo, SNssai};
use ntnqof_ntn::{load_ntn_config_from_str, validate_ntn_config, HttpClassifierClient, NtnContext};
use ntnqof_qof::{
    load_qof_config_from_str, validate_qof_config, HttpNtnClient, QofContext, SessionRelay,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::test_utils::TestResult;

/// gNB N3 address of the reference deployment
pub const GNB_N3: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
/// UPF N3 address of the reference deployment
pub const UPF_N3: Ipv4Addr = Ipv4Addr::new(10, 1, 0, 1);
/// RAN classifier ingress reachable from the gNB
pub const RAN_INGRESS: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 254);
/// CN classifier ingress reachable from the UPF
pub const CN_INGRESS: Ipv4Addr = Ipv4Addr::new(10, 1, 0, 254);
/// UE address used by the scenarios
pub const UE_IPV4: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 5);

/// NTN-QoF configuration pointing at classifier agents on local ports.
pub fn ntn_config(ran_port: u16, cn_port: u16) -> NtnConfig {
    let yaml = format!(
        r#"
info:
  version: 1.0.0
configuration:
  NtnName: ntn-qof-it
  sbi: {{ scheme: http, registerIPv4: 127.0.0.1, port: 9000 }}
  qos: {{ 5: 7 }}
  slice_aware: true
  slice:
    - {{ id: 1, classifier-ran-endpoint: A, classifier-cn-endpoint: B, forward: 100, return: 50 }}
  classifiers:
    ran: {{ registerIPv4: 127.0.0.1, port: {ran_port}, ingress: [{RAN_INGRESS}] }}
    cn: {{ registerIPv4: 127.0.0.1, port: {cn_port}, ingress: [{CN_INGRESS}] }}
  http-client: {{ timeout-ms: 2000, connect-timeout-ms: 500 }}
logger:
  level: debug
"#
    );
    let config = load_ntn_config_from_str(&yaml).expect("reference NTN config parses");
    validate_ntn_config(&config).expect("reference NTN config is valid");
    config
}

/// QoF configuration relaying to `ntn_uri`.
pub fn qof_config(ntn_uri: &str) -> QofConfig {
    let yaml = format!(
        r#"
info:
  version: 1.0.0
configuration:
  QofName: qof-it
  sbi: {{ scheme: http, registerIPv4: 127.0.0.1, port: 8010 }}
  ntnUri: {ntn_uri}
  qos: {{ 9: 5 }}
  slice:
    - sNssai: {{ sst: 1, sd: "010203" }}
      ran: {GNB_N3}
      cn: {UPF_N3}
      id: "1"
      amf: 10.2.0.1
      default: true
"#
    );
    let config = load_qof_config_from_str(&yaml).expect("reference QoF config parses");
    validate_qof_config(&config).expect("reference QoF config is valid");
    config
}

/// SMF session info for the reference slice.
pub fn session_info(uteid: u32, dteid: u32) -> QofSessionInfo {
    QofSessionInfo {
        session_id: 1,
        snssai: SNssai::with_sd_u32(1, 0x010203),
        supi: "imsi-208930000000003".to_string(),
        uteid,
        dteid,
        ipv4: UE_IPV4,
        five_qi: 9,
    }
}

/// An in-process network function serving on an ephemeral port.
pub struct RunningFunction {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl RunningFunction {
    /// `http://127.0.0.1:{port}`
    pub fn uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// `{uri}{path}`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.uri(), path)
    }
}

impl Drop for RunningFunction {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn local_listener() -> TestResult<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    Ok((listener, addr))
}

/// Starts the NTN-QoF router for `config` on `127.0.0.1:0`.
pub async fn spawn_ntn(config: &NtnConfig) -> TestResult<RunningFunction> {
    let ctx = Arc::new(NtnContext::from_config(config)?);
    let client = HttpClassifierClient::new(&config.configuration.http_client)?;
    let app = ntnqof_ntn::router(ntnqof_ntn::AppState::new(ctx, Arc::new(client)));

    let (listener, addr) = local_listener().await?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(ntnqof_ntn::serve(listener, app, async {
        let _ = shutdown_rx.await;
    }));

    Ok(RunningFunction {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Starts the QoF router for `config` on `127.0.0.1:0`.
pub async fn spawn_qof(config: &QofConfig) -> TestResult<(RunningFunction, SessionRelay)> {
    let ctx = Arc::new(QofContext::from_config(config)?);
    let client = HttpNtnClient::new(ctx.clone(), &config.configuration.http_client)?;
    let relay = SessionRelay::new(ctx.clone(), Arc::new(client));
    let app = ntnqof_qof::router(ntnqof_qof::AppState {
        ctx,
        relay: relay.clone(),
    });

    let (listener, addr) = local_listener().await?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(ntnqof_qof::serve(listener, app, async {
        let _ = shutdown_rx.await;
    }));

    Ok((
        RunningFunction {
            addr,
            shutdown_tx: Some(shutdown_tx),
        },
        relay,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_configs_are_valid() {
        let ntn = ntn_config(18081, 18082);
        assert_eq!(ntn.configuration.slice.len(), 1);
        assert_eq!(ntn.configuration.http_client.timeout_ms, 2000);

        let qof = qof_config("http://127.0.0.1:9000");
        assert_eq!(qof.configuration.slice[0].id, 1);
        assert!(qof.configuration.slice[0].default);
    }

    #[test]
    fn test_session_info_matches_reference_slice() {
        let info = session_info(111, 222);
        assert_eq!(info.snssai, SNssai::with_sd_u32(1, 0x010203));
        assert_eq!(info.five_qi, 9);
    }
}
