//! SBI message bodies exchanged between the SMF, the QoF and the NTN-QoF.
//!
//! Field names follow the JSON already spoken by the deployed peers, so the
//! Rust names and the wire names differ in a few places.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::types::{slice_id_str, Dscp, FiveQi, SNssai, SliceId, Teid};

/// Session path on the NTN-QoF that creates a bridged session.
pub const NTN_NEW_SESSION_PATH: &str = "/ntn-session/new-session";
/// Session path on the NTN-QoF that triggers an admission-control broadcast.
pub const NTN_ADMISSION_CONTROL_PATH: &str = "/ntn-session/admission-control";
/// Session path on the QoF that receives session info from the SMF.
pub const QOF_NEW_SESSION_PATH: &str = "/qof-session/new-session";

/// Uplink/downlink tunnel pair of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceMatch {
    /// Uplink TEID (RAN to core)
    pub uteid: Teid,
    /// Downlink TEID (core to RAN)
    pub dteid: Teid,
}

/// Terrestrial QoS marking of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosMatch {
    /// Terrestrial DSCP
    pub dscp: Dscp,
}

/// One mobile session being bridged over the satellite backhaul.
///
/// Lives only for the duration of the request that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtnSession {
    /// RAN-side tunnel address (gNB N3)
    pub ran: Ipv4Addr,
    /// CN-side tunnel address (UPF N3)
    pub upf: Ipv4Addr,
    /// Tunnel endpoint ids
    pub slice_match: SliceMatch,
    /// Terrestrial marking
    pub qos_match: QosMatch,
    /// Satellite slice id
    #[serde(with = "slice_id_str")]
    pub id: SliceId,
    /// UE IPv4 address
    pub ipv4: Ipv4Addr,
}

/// Control-plane addresses of a slice, sent as the admission-control trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPlane {
    /// RAN control-plane address
    pub ran: String,
    /// Core control-plane address (AMF)
    pub cn: String,
    /// Satellite slice id
    pub id: SliceId,
}

/// Per-session information pushed by the SMF to the QoF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QofSessionInfo {
    /// PDU session id
    #[serde(rename = "sessionid", default)]
    pub session_id: i32,
    /// Session S-NSSAI
    #[serde(rename = "Snssai", alias = "snssai")]
    pub snssai: SNssai,
    /// Subscriber id
    #[serde(default)]
    pub supi: String,
    /// Uplink TEID
    pub uteid: Teid,
    /// Downlink TEID
    pub dteid: Teid,
    /// UE IPv4 address
    pub ipv4: Ipv4Addr,
    /// 5QI of the default QoS flow
    #[serde(rename = "var5qi")]
    pub five_qi: FiveQi,
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbiMessage {
    /// Human-readable status
    pub message: String,
}

impl SbiMessage {
    /// `{"message": "success"}`
    pub fn success() -> Self {
        Self {
            message: "success".to_string(),
        }
    }
}
