//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Run the first content load before traffic arrives
//! - Start background tasks (watcher, signal listeners)
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Config and bind errors are fatal; content errors are not
//! - A failed first load leaves the server up with no feeds registered

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::content::FsContentSource;
use crate::http::server::{AppState, HttpServer};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::observability::metrics;
use crate::reload::{ContentWatcher, ReloadTrigger};

pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let source = Arc::new(FsContentSource::new(config.content.data_dir.clone()));
    let state = AppState::new(config, source);
    let shutdown = Shutdown::new();

    if let Err(e) = state.orchestrator.reload(ReloadTrigger::Startup).await {
        tracing::warn!(
            error = %e,
            "Initial content load failed; serving without feeds until the next successful reload"
        );
    }

    // Dropping the watcher stops it, so it lives as long as the server
    let _watcher = if state.config.content.watch {
        let watcher = ContentWatcher::new(
            &state.config.content.data_dir,
            Duration::from_millis(state.config.content.watch_debounce_ms),
        );
        match watcher.spawn(Arc::clone(&state.orchestrator), shutdown.subscribe()) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "Failed to start content watcher");
                None
            }
        }
    } else {
        None
    };

    signals::spawn_shutdown_listener(shutdown.clone());
    signals::spawn_reload_listener(Arc::clone(&state.orchestrator), &shutdown);

    HttpServer::new(state).run(listener, shutdown.subscribe()).await?;
    Ok(())
}
