//! ntnqof-ntn - satellite-side QoS/slice translation function
//!
//! The NTN-QoF receives bridged sessions from the QoF and programs the two
//! classifier agents that sit on either side of the satellite link:
//!
//! ```text
//!          QoF
//!           │ POST /ntn-session/new-session
//!           ▼
//!   ┌───────────────┐
//!   │    NTN-QoF    │  translate DSCP, resolve slice
//!   └───┬───────┬───┘
//!       │       │   concurrent legs
//!       ▼       ▼
//!   classifier  classifier
//!     (cn)        (ran)
//!   forward     return
//! ```
//!
//! - [`translate`]: DSCP and slice tables
//! - [`resolver`]: per-classifier ingress/egress selection
//! - [`classifier`]: wire messages and the classifier client
//! - [`provision`]: two-leg session fan-out
//! - [`admission`]: per-slice budget broadcast
//! - [`sbi`]: axum router
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ntnqof_ntn::{load_and_validate_ntn_config, AppState, HttpClassifierClient, NtnContext};
//!
//! let config = load_and_validate_ntn_config("config/ntnqof.yaml")?;
//! let ctx = Arc::new(NtnContext::from_config(&config)?);
//! let client = Arc::new(HttpClassifierClient::new(&config.configuration.http_client)?);
//! let app = ntnqof_ntn::sbi::router(AppState::new(ctx, client));
//! ```

pub mod admission;
pub mod app;
pub mod classifier;
pub mod context;
pub mod provision;
pub mod resolver;
pub mod sbi;
pub mod translate;

pub use admission::{admission_requests, AdmissionBroadcaster};
pub use app::{
    load_and_validate_ntn_config, load_ntn_config, load_ntn_config_from_str, validate_ntn_config,
    ConfigError, ConfigValidationError,
};
pub use classifier::{
    AdmissionControl, AdmissionRequest, ClassifierClient, HttpClassifierClient, PipeInstruction,
    ADMISSION_PATH, PIPE_PATH,
};
pub use context::NtnContext;
pub use provision::{pipe_instruction, FanOutReport, Leg, LegReport, Provisioner};
pub use resolver::{Candidate, ClassifierAgent, ClassifierSide};
pub use sbi::{router, serve, ApiError, AppState};
pub use translate::{QosTable, SliceRecord, SliceTable};
