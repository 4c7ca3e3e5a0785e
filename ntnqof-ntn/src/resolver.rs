//! Interface Resolver
//!
//! A classifier agent has one address per local subnet it can forward on.
//! Given a session-side address, the resolver derives that address's subnet
//! (prefix length per agent, /24 by default) and returns the first configured
//! candidate inside it.
//!
//! Candidate order is a configuration contract: when several candidates share
//! the session's subnet, the one listed first is used.

use std::fmt;
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use ntnqof_common::{ClassifierConfig, QofError, QofResult};

/// Which classifier agent a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierSide {
    /// Radio-facing agent
    Ran,
    /// Core-network-facing agent
    Cn,
}

impl fmt::Display for ClassifierSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierSide::Ran => write!(f, "ran"),
            ClassifierSide::Cn => write!(f, "cn"),
        }
    }
}

/// One configured interface address of a classifier agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Text as written in the configuration
    pub raw: String,
    /// Address that is matched and returned
    pub addr: Ipv4Addr,
}

impl Candidate {
    /// Parses `a.b.c.d` or `a.b.c.d/len`. In CIDR form the address part is
    /// kept as written, host bits included.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let addr = if trimmed.contains('/') {
            trimmed.parse::<Ipv4Net>().ok()?.addr()
        } else {
            trimmed.parse::<Ipv4Addr>().ok()?
        };
        Some(Self {
            raw: trimmed.to_string(),
            addr,
        })
    }
}

/// A remote traffic-classification agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierAgent {
    side: ClassifierSide,
    address: String,
    port: u16,
    ingress: Vec<Candidate>,
    egress: Vec<Candidate>,
    prefix_length: u8,
}

impl ClassifierAgent {
    /// Builds an agent from its configuration.
    ///
    /// Fails when a candidate is not an IPv4 address or the prefix length is
    /// above 32.
    pub fn from_config(side: ClassifierSide, cfg: &ClassifierConfig) -> QofResult<Self> {
        if cfg.prefix_length > 32 {
            return Err(QofError::ConfigurationMissing(format!(
                "classifiers.{side}.prefix-length {} is above 32",
                cfg.prefix_length
            )));
        }
        Ok(Self {
            side,
            address: cfg.register_ipv4.clone(),
            port: cfg.port,
            ingress: parse_candidates(side, "ingress", &cfg.ingress)?,
            egress: parse_candidates(side, "egress", &cfg.egress)?,
            prefix_length: cfg.prefix_length,
        })
    }

    pub fn side(&self) -> ClassifierSide {
        self.side
    }

    /// `http://{address}:{port}{path}`
    pub fn uri(&self, path: &str) -> String {
        format!("http://{}:{}{}", self.address, self.port, path)
    }

    /// Log label, e.g. `classifier-ran`.
    pub fn label(&self) -> String {
        format!("classifier-{}", self.side)
    }

    /// Ingress address of this agent reachable from `session_ip`.
    pub fn resolve_ingress(&self, session_ip: Ipv4Addr) -> QofResult<Ipv4Addr> {
        self.resolve(&self.ingress, session_ip)
    }

    /// Egress address of this agent reachable from `session_ip`.
    pub fn resolve_egress(&self, session_ip: Ipv4Addr) -> QofResult<Ipv4Addr> {
        self.resolve(&self.egress, session_ip)
    }

    fn resolve(&self, candidates: &[Candidate], session_ip: Ipv4Addr) -> QofResult<Ipv4Addr> {
        let network = Ipv4Net::new(session_ip, self.prefix_length)
            .map_err(|e| QofError::ConfigurationMissing(e.to_string()))?
            .trunc();

        candidates
            .iter()
            .find(|c| network.contains(&c.addr))
            .map(|c| c.addr)
            .ok_or_else(|| QofError::AddressResolution {
                ip: session_ip,
                network: network.to_string(),
                candidates: candidates.iter().map(|c| c.raw.clone()).collect(),
            })
    }
}

fn parse_candidates(
    side: ClassifierSide,
    list: &str,
    raw: &[String],
) -> QofResult<Vec<Candidate>> {
    raw.iter()
        .enumerate()
        .map(|(i, entry)| {
            Candidate::parse(entry).ok_or_else(|| {
                QofError::ConfigurationMissing(format!(
                    "classifiers.{side}.{list}[{i}] is not an IPv4 address: {entry:?}"
                ))
            })
        })
        .collect()
}
