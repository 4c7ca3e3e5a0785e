//! Configuration Loading for the NTN-QoF
//!
//! Wraps the `NtnConfig` from `ntnqof-common` with the checks that have to
//! pass before the service starts: version, SBI settings, slice table and
//! both classifier agents.
//!
//! # Example
//!
//! ```rust,ignore
//! use ntnqof_ntn::app::load_and_validate_ntn_config;
//!
//! let config = load_and_validate_ntn_config("config/ntnqof.yaml")?;
//! ```

use std::collections::HashSet;
use std::path::Path;

use ntnqof_common::{ClassifierConfig, NtnConfig, SbiConfig, EXPECTED_CONFIG_VERSION};
use thiserror::Error;

use crate::resolver::Candidate;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ConfigValidationError),
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// `info.version` is not the one this release reads
    #[error("Unsupported config version {found:?}, expected {expected}")]
    UnsupportedVersion { found: String, expected: &'static str },

    /// Missing or unusable `sbi` section
    #[error("Invalid SBI configuration: {0}")]
    InvalidSbi(String),

    /// Duplicate or empty slice entries
    #[error("Invalid slice configuration: {0}")]
    InvalidSlice(String),

    /// Classifier agent absent
    #[error("No {0} classifier configured")]
    MissingClassifier(&'static str),

    /// Classifier agent present but unusable
    #[error("Invalid classifier configuration: {0}")]
    InvalidClassifier(String),
}

/// Loads an NTN-QoF configuration from a YAML file.
pub fn load_ntn_config<P: AsRef<Path>>(path: P) -> Result<NtnConfig, ConfigError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    load_ntn_config_from_str(&contents)
}

/// Loads an NTN-QoF configuration from a YAML string.
pub fn load_ntn_config_from_str(yaml: &str) -> Result<NtnConfig, ConfigError> {
    serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Validates an NTN-QoF configuration.
///
/// # Validation Rules
///
/// - `info.version` must be `1.0.0`
/// - `sbi` must be present, with scheme `http` and a non-zero port if set
/// - slice ids must be unique and endpoints non-empty
/// - both classifiers must be present, with a non-zero port, parseable
///   candidates and a prefix length of at most 32
pub fn validate_ntn_config(config: &NtnConfig) -> Result<(), ConfigValidationError> {
    validate_version(&config.info.version)?;
    validate_sbi(config.configuration.sbi.as_ref())?;

    let mut seen = HashSet::new();
    for slice in &config.configuration.slice {
        if !seen.insert(slice.slice_id) {
            return Err(ConfigValidationError::InvalidSlice(format!(
                "slice id {} is configured more than once",
                slice.slice_id
            )));
        }
        if slice.classifier_ran_endpoint.is_empty() || slice.classifier_cn_endpoint.is_empty() {
            return Err(ConfigValidationError::InvalidSlice(format!(
                "slice {} has an empty classifier endpoint",
                slice.slice_id
            )));
        }
    }

    let classifiers = config
        .configuration
        .classifiers
        .as_ref()
        .ok_or_else(|| {
            ConfigValidationError::InvalidClassifier("classifiers section missing".into())
        })?;
    let ran = classifiers
        .ran
        .as_ref()
        .ok_or(ConfigValidationError::MissingClassifier("ran"))?;
    let cn = classifiers
        .cn
        .as_ref()
        .ok_or(ConfigValidationError::MissingClassifier("cn"))?;
    validate_classifier("ran", ran)?;
    validate_classifier("cn", cn)?;

    Ok(())
}

fn validate_version(version: &str) -> Result<(), ConfigValidationError> {
    if version != EXPECTED_CONFIG_VERSION {
        return Err(ConfigValidationError::UnsupportedVersion {
            found: version.to_string(),
            expected: EXPECTED_CONFIG_VERSION,
        });
    }
    Ok(())
}

fn validate_sbi(sbi: Option<&SbiConfig>) -> Result<(), ConfigValidationError> {
    let sbi = sbi.ok_or_else(|| ConfigValidationError::InvalidSbi("section missing".into()))?;
    if sbi.scheme != "http" {
        return Err(ConfigValidationError::InvalidSbi(format!(
            "scheme {:?} is not served in-process, use http",
            sbi.scheme
        )));
    }
    if sbi.port == Some(0) {
        return Err(ConfigValidationError::InvalidSbi("port 0".into()));
    }
    Ok(())
}

fn validate_classifier(
    side: &'static str,
    cfg: &ClassifierConfig,
) -> Result<(), ConfigValidationError> {
    if cfg.register_ipv4.is_empty() {
        return Err(ConfigValidationError::InvalidClassifier(format!(
            "{side}: registerIPv4 is empty"
        )));
    }
    if cfg.port == 0 {
        return Err(ConfigValidationError::InvalidClassifier(format!(
            "{side}: port 0"
        )));
    }
    if cfg.prefix_length > 32 {
        return Err(ConfigValidationError::InvalidClassifier(format!(
            "{side}: prefix-length {} is above 32",
            cfg.prefix_length
        )));
    }
    for (list, entries) in [("ingress", &cfg.ingress), ("egress", &cfg.egress)] {
        if let Some(bad) = entries.iter().find(|e| Candidate::parse(e).is_none()) {
            return Err(ConfigValidationError::InvalidClassifier(format!(
                "{side}: {list} entry {bad:?} is not an IPv4 address"
            )));
        }
    }
    Ok(())
}

/// Loads and validates an NTN-QoF configuration in one step.
pub fn load_and_validate_ntn_config<P: AsRef<Path>>(path: P) -> Result<NtnConfig, ConfigError> {
    let config = load_ntn_config(path)?;
    validate_ntn_config(&config)?;
    Ok(config)
}
