//! Error types shared by the ntnqof network functions
//!
//! Every failure that crosses an SBI boundary is one of the [`ErrorKind`]s
//! below. The kind is what callers see in the structured failure body; the
//! message carries the diagnostics.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure category reported to SBI callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A required table or agent entry is absent from the configuration
    ConfigurationMissing,
    /// QoS marking, 5QI, slice id or S-NSSAI lookup miss
    TranslationNotFound,
    /// No classifier candidate address matched the session subnet
    AddressResolutionFailure,
    /// Classifier agent (or peer NF) unreachable or returned an error status
    RemoteProvisioningFailure,
    /// Inbound payload failed decoding or validation
    MalformedRequest,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigurationMissing => write!(f, "ConfigurationMissing"),
            ErrorKind::TranslationNotFound => write!(f, "TranslationNotFound"),
            ErrorKind::AddressResolutionFailure => write!(f, "AddressResolutionFailure"),
            ErrorKind::RemoteProvisioningFailure => write!(f, "RemoteProvisioningFailure"),
            ErrorKind::MalformedRequest => write!(f, "MalformedRequest"),
        }
    }
}

/// Error type for translation, resolution and provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QofError {
    /// Required configuration entry is absent.
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    /// Lookup miss in one of the translation tables.
    #[error("No translation for {table} key {key}")]
    TranslationNotFound {
        /// Table that was queried (e.g. "qos", "slice", "s-nssai")
        table: &'static str,
        /// Key that was not found, rendered for diagnostics
        key: String,
    },

    /// None of the configured candidates lies in the session subnet.
    #[error("No candidate address in {network} for {ip} (candidates: [{}])", candidates.join(", "))]
    AddressResolution {
        /// Session-side address the subnet was derived from
        ip: Ipv4Addr,
        /// Derived network, in CIDR notation
        network: String,
        /// Candidate list that was searched, in configured order
        candidates: Vec<String>,
    },

    /// Remote call failed in transport or returned a non-success status.
    #[error("Remote provisioning to {target} failed: {reason}")]
    RemoteProvisioning {
        /// URI of the remote endpoint
        target: String,
        /// Transport error or status line
        reason: String,
    },

    /// Inbound payload could not be decoded or failed validation.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

impl QofError {
    /// Shorthand for a lookup miss.
    pub fn not_found(table: &'static str, key: impl fmt::Display) -> Self {
        QofError::TranslationNotFound {
            table,
            key: key.to_string(),
        }
    }

    /// Returns the caller-visible failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QofError::ConfigurationMissing(_) => ErrorKind::ConfigurationMissing,
            QofError::TranslationNotFound { .. } => ErrorKind::TranslationNotFound,
            QofError::AddressResolution { .. } => ErrorKind::AddressResolutionFailure,
            QofError::RemoteProvisioning { .. } => ErrorKind::RemoteProvisioningFailure,
            QofError::MalformedRequest(_) => ErrorKind::MalformedRequest,
        }
    }
}

/// Result alias used throughout the ntnqof crates.
pub type QofResult<T> = Result<T, QofError>;
