//! Common types and utilities for ntnqof
//!
//! This crate provides the configuration structures, SBI message bodies,
//! error kinds, logging setup and outbound HTTP client shared by the NTN-QoF (satellite side) and
//! the QoF (mobile-core side).

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod sbi_client;
pub mod shutdown;
pub mod types;

pub use config::{
    ClassifierConfig, ClassifiersConfig, HttpClientConfig, Info, LoggerConfig, NtnConfig,
    NtnConfiguration, QofConfig, QofConfiguration, QofSliceConfig, SbiConfig, SliceConfig,
    TlsConfig, DEFAULT_PREFIX_LENGTH, EXPECTED_CONFIG_VERSION,
};
pub use error::{ErrorKind, QofError, QofResult};
pub use logging::{init_logging, init_logging_with_filter, log_sbi_message, Direction, LogLevel};
pub use models::{
    ControlPlane, NtnSession, QofSessionInfo, QosMatch, SbiMessage, SliceMatch,
    NTN_ADMISSION_CONTROL_PATH, NTN_NEW_SESSION_PATH, QOF_NEW_SESSION_PATH,
};
pub use sbi_client::SbiClient;
pub use shutdown::wait_for_shutdown;
pub use types::*;
