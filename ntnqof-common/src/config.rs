//! Configuration structures for the NTN-QoF and QoF functions
//!
//! Both functions read a YAML file with the same outer shape:
//!
//! ```yaml
//! info:
//!   version: 1.0.0
//! configuration:
//!   sbi: { scheme: http, registerIPv4: 127.0.0.1, port: 8000 }
//!   ...
//! logger:
//!   level: info
//! ```
//!
//! The structures here only describe the file; validation lives in each
//! binary crate's `app::config_loader`.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{slice_id_str, Dscp, FiveQi, SNssai, SliceId};

/// Config file version this release understands.
pub const EXPECTED_CONFIG_VERSION: &str = "1.0.0";

/// Address registered for the SBI when none is configured.
pub const DEFAULT_SBI_IPV4: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// SBI port used when none is configured.
pub const DEFAULT_SBI_PORT: u16 = 8000;

/// Bind address used when `bindingIPv4` is absent.
pub const DEFAULT_BINDING_IPV4: &str = "0.0.0.0";

/// Historical subnet width used by the interface resolver.
pub const DEFAULT_PREFIX_LENGTH: u8 = 24;

/// `info` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// Config file version
    #[serde(default)]
    pub version: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

/// `logger` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// trace, debug, info, warn or error
    #[serde(default, alias = "debugLevel")]
    pub level: Option<String>,
    /// Include source location in log lines
    #[serde(default, rename = "reportCaller")]
    pub report_caller: bool,
}

/// SBI server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbiConfig {
    /// URI scheme, only `http` is served in-process
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Certificate paths, kept for deployments terminating TLS in front
    #[serde(default)]
    pub tls: Option<TlsConfig>,
    /// Address advertised to peers
    #[serde(default, rename = "registerIPv4")]
    pub register_ipv4: Option<String>,
    /// Bind address, or the name of an environment variable holding it
    #[serde(default, rename = "bindingIPv4")]
    pub binding_ipv4: Option<String>,
    /// Listen port
    #[serde(default)]
    pub port: Option<u16>,
}

fn default_scheme() -> String {
    "http".to_string()
}

impl SbiConfig {
    /// Advertised address, `127.0.0.1` when unset.
    pub fn register_ipv4(&self) -> String {
        self.register_ipv4
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SBI_IPV4.to_string())
    }

    /// Listen port, 8000 when unset or zero.
    pub fn port(&self) -> u16 {
        match self.port {
            Some(port) if port != 0 => port,
            _ => DEFAULT_SBI_PORT,
        }
    }

    /// Resolves the bind address.
    ///
    /// `bindingIPv4` is first treated as an environment variable name; if that
    /// variable is set its value wins. Otherwise the literal value is used, and
    /// `0.0.0.0` when nothing is configured.
    pub fn binding_ipv4(&self) -> String {
        self.binding_ipv4_with(|name| std::env::var(name).ok())
    }

    /// [`binding_ipv4`](Self::binding_ipv4) with an injectable environment.
    pub fn binding_ipv4_with<F>(&self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = self.binding_ipv4.as_deref().filter(|s| !s.is_empty()) else {
            return DEFAULT_BINDING_IPV4.to_string();
        };
        match lookup(raw).filter(|v| !v.is_empty()) {
            Some(from_env) => from_env,
            None => raw.to_string(),
        }
    }
}

/// TLS material paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Certificate chain (PEM)
    #[serde(default)]
    pub pem: Option<String>,
    /// Private key
    #[serde(default)]
    pub key: Option<String>,
}

/// Outbound HTTP client timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Whole-request timeout in milliseconds
    #[serde(default = "default_timeout_ms", rename = "timeout-ms")]
    pub timeout_ms: u64,
    /// TCP connect timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms", rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_connect_timeout_ms() -> u64 {
    2000
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl HttpClientConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Connect timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

// ============================================================================
// NTN-QoF
// ============================================================================

/// Top-level NTN-QoF configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NtnConfig {
    /// Version information
    #[serde(default)]
    pub info: Info,
    /// Function configuration
    pub configuration: NtnConfiguration,
    /// Log settings
    #[serde(default)]
    pub logger: LoggerConfig,
}

/// `configuration` section of the NTN-QoF file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NtnConfiguration {
    /// Instance name
    #[serde(default, rename = "NtnName")]
    pub ntn_name: String,
    /// SBI server
    #[serde(default)]
    pub sbi: Option<SbiConfig>,
    /// Terrestrial DSCP to satellite DSCP
    #[serde(default)]
    pub qos: BTreeMap<Dscp, Dscp>,
    /// Whether classifiers enforce per-slice budgets
    #[serde(default)]
    pub slice_aware: bool,
    /// Satellite slices
    #[serde(default)]
    pub slice: Vec<SliceConfig>,
    /// RAN- and CN-facing classifier agents
    #[serde(default)]
    pub classifiers: Option<ClassifiersConfig>,
    /// Outbound call timeouts
    #[serde(default, rename = "http-client")]
    pub http_client: HttpClientConfig,
}

/// One satellite slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceConfig {
    /// Slice id, unique across the table
    #[serde(rename = "id")]
    pub slice_id: SliceId,
    /// Satellite-side tunnel address behind the RAN classifier
    #[serde(rename = "classifier-ran-endpoint")]
    pub classifier_ran_endpoint: String,
    /// Satellite-side tunnel address behind the CN classifier
    #[serde(rename = "classifier-cn-endpoint")]
    pub classifier_cn_endpoint: String,
    /// Forward (core to RAN) throughput budget
    pub forward: u64,
    /// Return (RAN to core) throughput budget
    #[serde(rename = "return")]
    pub return_: u64,
}

/// Both classifier agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiersConfig {
    /// RAN-facing agent
    #[serde(default)]
    pub ran: Option<ClassifierConfig>,
    /// CN-facing agent
    #[serde(default)]
    pub cn: Option<ClassifierConfig>,
}

/// One classifier agent.
///
/// The order of `ingress` and `egress` is significant: when several
/// candidates fall inside a session's subnet, the first one listed wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Agent address
    #[serde(rename = "registerIPv4")]
    pub register_ipv4: String,
    /// Agent port
    pub port: u16,
    /// Ingress candidates (`a.b.c.d` or `a.b.c.d/len`)
    #[serde(default)]
    pub ingress: Vec<String>,
    /// Egress candidates (`a.b.c.d` or `a.b.c.d/len`)
    #[serde(default)]
    pub egress: Vec<String>,
    /// Prefix length used to derive the session subnet
    #[serde(default = "default_prefix_length", rename = "prefix-length")]
    pub prefix_length: u8,
}

fn default_prefix_length() -> u8 {
    DEFAULT_PREFIX_LENGTH
}

// ============================================================================
// QoF
// ============================================================================

/// Top-level QoF configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QofConfig {
    /// Version information
    #[serde(default)]
    pub info: Info,
    /// Function configuration
    pub configuration: QofConfiguration,
    /// Log settings
    #[serde(default)]
    pub logger: LoggerConfig,
}

/// `configuration` section of the QoF file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QofConfiguration {
    /// Instance name
    #[serde(default, rename = "QofName")]
    pub qof_name: String,
    /// SBI server
    #[serde(default)]
    pub sbi: Option<SbiConfig>,
    /// Base URI of the NTN-QoF
    #[serde(default, rename = "ntnUri")]
    pub ntn_uri: Option<String>,
    /// 5QI to DSCP
    #[serde(default)]
    pub qos: BTreeMap<FiveQi, Dscp>,
    /// Terrestrial slices
    #[serde(default)]
    pub slice: Vec<QofSliceConfig>,
    /// Outbound call timeouts
    #[serde(default, rename = "http-client")]
    pub http_client: HttpClientConfig,
}

/// One terrestrial slice and its satellite counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QofSliceConfig {
    /// Terrestrial slice selector
    #[serde(rename = "sNssai")]
    pub snssai: SNssai,
    /// RAN tunnel address for sessions of this slice
    pub ran: Ipv4Addr,
    /// CN tunnel address for sessions of this slice
    pub cn: Ipv4Addr,
    /// Satellite slice id
    #[serde(with = "slice_id_str")]
    pub id: SliceId,
    /// AMF address announced with the default slice
    #[serde(default)]
    pub amf: Option<String>,
    /// Announce this slice to the NTN-QoF at start-up
    #[serde(default)]
    pub default: bool,
}
