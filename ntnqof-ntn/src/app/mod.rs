//! NTN-QoF application support
//!
//! Configuration loading and validation for the `ntn-qof` binary.

mod config_loader;

pub use config_loader::{
    load_and_validate_ntn_config, load_ntn_config, load_ntn_config_from_str, validate_ntn_config,
    ConfigError, ConfigValidationError,
};
