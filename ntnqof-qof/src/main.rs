//! QoF network function
//!
//! # Usage
//!
//! ```bash
//! qof -c config/qof.yaml
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use ntnqof_common::{init_logging, init_logging_with_filter, wait_for_shutdown, LogLevel, QofConfig};
use ntnqof_qof::{
    load_and_validate_qof_config, router, serve, AppState, HttpNtnClient, QofContext, SessionRelay,
};

/// QoF - mobile-core QoS/slice translation function
#[derive(Parser, Debug)]
#[command(name = "qof")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the QoF configuration file (YAML)
    #[arg(short = 'c', long = "config", alias = "qofcfg", value_name = "FILE")]
    config_file: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_and_validate_qof_config(&args.config_file) {
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
            info!("QoF exited successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("QoF failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: QofConfig) -> Result<()> {
    let ctx = Arc::new(QofContext::from_config(&config).context("Failed to build QoF context")?);
    let client = HttpNtnClient::new(ctx.clone(), &config.configuration.http_client)
        .context("Failed to build NTN-QoF client")?;
    let relay = SessionRelay::new(ctx.clone(), Arc::new(client));

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
        ntn_uri = %ctx.ntn_uri,
        "QoF starting"
    );

    let announcer = relay.clone();
    tokio::spawn(async move {
        announcer.announce_default_slice().await;
    });

    let app = router(AppState { ctx, relay });
    serve(listener, app, wait_for_shutdown(signal::ctrl_c()))
        .await
        .context("SBI server error")?;

    Ok(())
}
