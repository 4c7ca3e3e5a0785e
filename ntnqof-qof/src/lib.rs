//! ntnqof-qof - mobile-core side QoS/slice translation function
//!
//! The QoF receives per-session info from the SMF, translates the S-NSSAI
//! and 5QI into a satellite slice id and DSCP, and relays the resulting
//! session to the NTN-QoF. At start-up it can announce a default slice,
//! which makes the NTN-QoF push admission control to its classifiers.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ntnqof_qof::{load_and_validate_qof_config, HttpNtnClient, QofContext, SessionRelay};
//!
//! let config = load_and_validate_qof_config("config/qof.yaml")?;
//! let ctx = Arc::new(QofContext::from_config(&config)?);
//! let client = HttpNtnClient::new(ctx.clone(), &config.configuration.http_client)?;
//! let relay = SessionRelay::new(ctx, Arc::new(client));
//! ```

pub mod app;
pub mod context;
pub mod relay;
pub mod sbi;

pub use app::{
    load_and_validate_qof_config, load_qof_config, load_qof_config_from_str, validate_qof_config,
    ConfigError, ConfigValidationError,
};
pub use context::QofContext;
pub use relay::{HttpNtnClient, NtnSessionClient, SessionRelay};
pub use sbi::{router, serve, ApiError, AppState};
