//! Blog server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────────▶ http::server ──┬─▶ /healthz
//!                          (axum)       ├─▶ webhook ──────┐
//!                                       ├─▶ admin API ────┤
//!                                       └─▶ feeds ◀─┐     │
//!                                                   │     ▼
//!                                           routing::RouteTable ◀── reload::ReloadOrchestrator
//!                                                                    │  ▲
//!     data_dir (YAML) ──▶ content ──▶ snapshot::build_snapshot ──────┘  │
//!                                                                       │
//!                             SIGHUP / content watcher ─────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use blog_server::config::{load_config, validate_config, ConfigError, ServerConfig};
use blog_server::lifecycle::startup;
use blog_server::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "blog-server", version, about = "Self-hosted blog feed server")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory, overriding `content.data_dir`.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(data_dir) = args.data_dir {
        config.content.data_dir = data_dir;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "blog-server starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        data_dir = %config.content.data_dir.display(),
        webhook = config.webhook.enabled,
        admin = config.admin.enabled,
        watch = config.content.watch,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
