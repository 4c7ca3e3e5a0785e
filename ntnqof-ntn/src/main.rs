//! NTN-QoF network function
//!
//! # Usage
//!
//! ```bash
//! ntn-qof -c config/ntnqof.yaml
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use ntnqof_common::{init_logging, init_logging_with_filter, wait_for_shutdown, LogLevel, NtnConfig};
use ntnqof_ntn::{
    load_and_validate_ntn_config, router, serve, AppState, HttpClassifierClient, NtnContext,
};

/// NTN-QoF - satellite QoS/slice translation function
#[derive(Parser, Debug)]
#[command(name = "ntn-qof")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the NTN-QoF configuration file (YAML)
    #[arg(short = 'c', long = "config", alias = "ntncfg", value_name = "FILE")]
    config_file: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_and_validate_ntn_config(&args.config_file) {
        Ok(config) => config,
        Err(e) => {
            init_logging(LogLevel::Info);
            error!("Failed to load configuration from {}: {}", args.config_file, e);
            return ExitCode::FAILURE;
        }
    };

    let logger = &config.logger;
    match logger.log_level() {
        Ok(level) => init_logging_with_filter(&level.to_string(), logger.report_caller),
        Err(rejected) => {
            init_logging_with_filter(&LogLevel::Info.to_string(), logger.report_caller);
            warn!(level = %rejected, "Unknown log level in configuration, using info");
        }
    }

    match run(config).await {
        Ok(()) => {
            info!("NTN-QoF exited successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("NTN-QoF failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: NtnConfig) -> Result<()> {
    let ctx = Arc::new(NtnContext::from_config(&config).context("Failed to build NTN context")?);
    let client = HttpClassifierClient::new(&config.configuration.http_client)
        .context("Failed to build classifier client")?;

    let sbi = config
        .configuration
        .sbi
        .as_ref()
        .context("sbi section missing")?;
    let bind = format!("{}:{}", sbi.binding_ipv4(), sbi.port());
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind SBI on {bind}"))?;
    info!(
        register = %sbi.register_ipv4(),
        bind = %bind,
        version = %config.info.version,
        "NTN-QoF starting"
    );

    let app = router(AppState::new(ctx, Arc::new(client)));
    serve(listener, app, wait_for_shutdown(signal::ctrl_c()))
        .await
        .context("SBI server error")?;

    Ok(())
}
