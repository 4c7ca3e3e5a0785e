//! QoF application support
//!
//! Configuration loading and validation for the `qof` binary.

mod config_loader;

pub use config_loader::{
    load_and_validate_qof_config, load_qof_config, load_qof_config_from_str, validate_qof_config,
    ConfigError, ConfigValidationError,
};
