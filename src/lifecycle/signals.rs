//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT, SIGHUP)
//! - Translate signals to internal events
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers a content reload, not shutdown

use std::sync::Arc;

use crate::lifecycle::shutdown::Shutdown;
use crate::reload::{ReloadOrchestrator, ReloadTrigger};

/// Trigger `shutdown` on Ctrl+C or SIGTERM.
pub fn spawn_shutdown_listener(shutdown: Shutdown) {
    tokio::spawn(async move {
        terminate_signal().await;
        tracing::info!("Shutdown signal received");
        shutdown.trigger();
    });
}

async fn terminate_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Reload content on every SIGHUP until shutdown.
#[cfg(unix)]
pub fn spawn_reload_listener(orchestrator: Arc<ReloadOrchestrator>, shutdown: &Shutdown) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGHUP handler");
            return;
        }
    };
    let mut stop = shutdown.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = stop.recv() => break,
                received = hangup.recv() => {
                    if received.is_none() {
                        break;
                    }
                    tracing::info!("SIGHUP received, reloading content");
                    let _ = orchestrator.reload(ReloadTrigger::Signal).await;
                }
            }
        }
    });
}

#[cfg(not(unix))]
pub fn spawn_reload_listener(_orchestrator: Arc<ReloadOrchestrator>, _shutdown: &Shutdown) {}
