//! Configuration Loading for the QoF
//!
//! Wraps the `QofConfig` from `ntnqof-common` with start-up checks.

use std::collections::HashSet;
use std::path::Path;

use ntnqof_common::{QofConfig, EXPECTED_CONFIG_VERSION};
use thiserror::Error;

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

    /// `ntnUri` absent or not an http URI
    #[error("Invalid ntnUri: {0}")]
    InvalidNtnUri(String),

    /// Duplicate selectors or more than one default slice
    #[error("Invalid slice configuration: {0}")]
    InvalidSlice(String),
}

/// Loads a QoF configuration from a YAML file.
pub fn load_qof_config<P: AsRef<Path>>(path: P) -> Result<QofConfig, ConfigError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    load_qof_config_from_str(&contents)
}

/// Loads a QoF configuration from a YAML string.
pub fn load_qof_config_from_str(yaml: &str) -> Result<QofConfig, ConfigError> {
    serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Validates a QoF configuration.
///
/// # Validation Rules
///
/// - `info.version` must be `1.0.0`
/// - `sbi` must be present, with scheme `http` and a non-zero port if set
/// - `ntnUri` must be present and start with `http://`
/// - S-NSSAIs must be unique and at most one slice may be `default`
pub fn validate_qof_config(config: &QofConfig) -> Result<(), ConfigValidationError> {
    if config.info.version != EXPECTED_CONFIG_VERSION {
        return Err(ConfigValidationError::UnsupportedVersion {
            found: config.info.version.clone(),
            expected: EXPECTED_CONFIG_VERSION,
        });
    }

    let c = &config.configuration;
    let sbi = c
        .sbi
        .as_ref()
        .ok_or_else(|| ConfigValidationError::InvalidSbi("section missing".into()))?;
    if sbi.scheme != "http" {
        return Err(ConfigValidationError::InvalidSbi(format!(
            "scheme {:?} is not served in-process, use http",
            sbi.scheme
        )));
    }
    if sbi.port == Some(0) {
        return Err(ConfigValidationError::InvalidSbi("port 0".into()));
    }

    match c.ntn_uri.as_deref() {
        None | Some("") => {
            return Err(ConfigValidationError::InvalidNtnUri("not configured".into()))
        }
        Some(uri) if !uri.starts_with("http://") => {
            return Err(ConfigValidationError::InvalidNtnUri(format!(
                "{uri:?} must start with http://"
            )))
        }
        Some(_) => {}
    }

    let mut seen = HashSet::new();
    for slice in &c.slice {
        if !seen.insert(slice.snssai) {
            return Err(ConfigValidationError::InvalidSlice(format!(
                "S-NSSAI {} is configured more than once",
                slice.snssai
            )));
        }
    }
    if c.slice.iter().filter(|s| s.default).count() > 1 {
        return Err(ConfigValidationError::InvalidSlice(
            "more than one slice is marked default".into(),
        ));
    }

    Ok(())
}

/// Loads and validates a QoF configuration in one step.
pub fn load_and_validate_qof_config<P: AsRef<Path>>(path: P) -> Result<QofConfig, ConfigError> {
    let config = load_qof_config(path)?;
    validate_qof_config(&config)?;
    Ok(config)
}
