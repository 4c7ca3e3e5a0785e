//! Logging infrastructure for ntnqof
//!
//! This module provides configurable logging using the `tracing` crate and
//! helpers for logging SBI exchanges with their JSON payloads.

use std::fmt;
use tracing::Level;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use crate::config::LoggerConfig;

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level (default)
    #[default]
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("unknown log level: {s}")),
        }
    }
}

impl LoggerConfig {
    /// Configured level, or `Err` carrying the rejected value.
    ///
    /// An absent level is `Info`. Callers log the rejected value once the
    /// subscriber is up and fall back to `Info`.
    pub fn log_level(&self) -> Result<LogLevel, String> {
        match self.level.as_deref() {
            None | Some("") => Ok(LogLevel::Info),
            Some(level) => level.parse::<LogLevel>().map_err(|_| level.to_string()),
        }
    }
}

/// Initialize the tracing subscriber with the specified log level.
///
/// This should be called once at application startup. The log level can be
/// overridden by the `RUST_LOG` environment variable.
pub fn init_logging(level: LogLevel) {
    init_logging_with_filter(&level.to_string(), false);
}

/// Initialize logging with a custom filter string.
///
/// Allows fine-grained control over which modules log at which levels, e.g.
/// `"info,ntnqof_ntn::provision=debug"`. With `report_caller` set, events
/// carry their source file and line.
pub fn init_logging_with_filter(filter: &str, report_caller: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(report_caller)
        .with_line_number(report_caller)
        .with_span_events(FmtSpan::NONE)
        .init();
}

/// SBI message direction for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Incoming/received message
    Rx,
    /// Outgoing/transmitted message
    Tx,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Rx => write!(f, "RX"),
            Direction::Tx => write!(f, "TX"),
        }
    }
}

/// Log an SBI exchange at debug level with its JSON body at trace level.
///
/// * `peer` - remote function or agent (e.g. "classifier-cn", "ntn-qof")
/// * `path` - request path
/// * `body` - serialized JSON body
pub fn log_sbi_message(direction: Direction, peer: &str, path: &str, body: &str) {
    tracing::debug!(
        peer = peer,
        direction = %direction,
        path = path,
        len = body.len(),
        "{} SBI {}",
        direction,
        path
    );
    tracing::trace!(peer = peer, path = path, body = body, "SBI payload");
}
