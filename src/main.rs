//! keyrelay - admission-controlled AI gateway
//!
//! Relays chat completions to upstream providers over pooled credentials.

use clap::Parser;
use keyrelay::server;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "gateway", version, about)]
struct Args {
    /// Path of the YAML configuration file
    #[arg(long, env = "KEYRELAY_CONFIG", default_value = "config/gateway.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    match server::builder::run_server(&args.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
