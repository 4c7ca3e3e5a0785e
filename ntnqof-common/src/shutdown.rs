//! Shutdown signal handling for the SBI servers

use std::fmt;
use std::future::Future;

use tracing::{error, info};

/// Resolves once `signal` fires.
///
/// A signal source that fails to install never resolves, so the server keeps
/// serving instead of stopping right after start.
pub async fn wait_for_shutdown<F, E>(signal: F)
where
    F: Future<Output = Result<(), E>>,
    E: fmt::Display,
{
    match signal.await {
        Ok(()) => info!("Received Ctrl+C, initiating shutdown..."),
        Err(e) => {
            error!(error = %e, "Cannot listen for Ctrl+C, shutdown by signal disabled");
            std::future::pending::<()>().await;
        }
    }
}
