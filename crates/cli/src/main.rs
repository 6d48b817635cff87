//! Storefront CLI - authenticated client for the storefront commerce API

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use storefront_core::FileTokenStore;
use storefront_http::{ExpirySignal, StorefrontClient};
use tracing::{Level, debug, error, warn};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Talk to the storefront commerce API")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Client configuration file (TOML, YAML or JSON)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true, env = "STOREFRONT_BASE_URL")]
    base_url: Option<String>,

    /// Where credentials are persisted
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    /// Per-request timeout in milliseconds
    #[arg(short = 't', long, global = true)]
    timeout_ms: Option<u64>,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.into(), cli.log_file.clone())?;

    let client_config = config::load_client_config(cli.config.as_deref())?;
    let store = FileTokenStore::new(cli.token_file.unwrap_or_else(config::default_token_file));
    debug!(token_file = %store.path().display(), "Using token file");

    let expiry = ExpirySignal::new();
    expiry.set_handler(|| {
        warn!("Your session has expired. Run `storefront login` to sign in again.");
    });

    let mut builder = StorefrontClient::builder()
        .config(client_config)
        .token_store(Arc::new(store))
        .expiry_signal(expiry);
    if let Some(base_url) = cli.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        builder = builder.timeout(Duration::from_millis(timeout_ms));
    }
    let client = builder.build()?;

    match cli.command.execute(&client).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Command failed: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
