//! looks-gateway - batch look generation service
//!
//! Loads configuration, initialises logging and serves the HTTP API.

use clap::Parser;
use looks_gateway::{Config, build_info, server};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "looks-gateway", version, about)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG", default_value = "config/gateway.yaml")]
    config: PathBuf,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit JSON formatted logs
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = match load_config(&args).await {
        Ok(config) => config,
        Err(e) => {
            init_logging(args.log_json);
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(args.log_json || config.server().log_json);
    if !args.config.exists() {
        warn!(
            path = %args.config.display(),
            "Configuration file not found, loaded from environment only"
        );
    }

    let build = build_info();
    info!(
        version = build.version,
        git_hash = build.git_hash,
        "Starting looks-gateway"
    );

    match server::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.config.exists() {
        Config::from_file(&args.config).await?
    } else {
        Config::from_env()?
    };

    if let Some(host) = &args.host {
        config.gateway.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.gateway.server.port = port;
    }
    config.validate()?;
    Ok(config)
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info,looks_gateway=info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("Logging already initialised: {}", e);
    }
}
