//! Content directory watcher.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};

use crate::reload::orchestrator::{ReloadOrchestrator, ReloadTrigger};

/// Watches the data directory and triggers a reload when files change.
///
/// Bursts of events (an editor saving, a `git pull`) collapse into a single
/// reload once the directory has been quiet for the debounce window.
pub struct ContentWatcher {
    path: PathBuf,
    debounce: Duration,
}

impl ContentWatcher {
    pub fn new(path: &Path, debounce: Duration) -> Self {
        Self {
            path: path.to_path_buf(),
            debounce,
        }
    }

    /// Start watching. The returned watcher must be kept alive; dropping it
    /// stops the notifications.
    pub fn spawn(
        self,
        orchestrator: Arc<ReloadOrchestrator>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<RecommendedWatcher, notify::Error> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_content_change(&event) {
                        let _ = tx.send(());
                    }
                }
                Err(e) => tracing::error!(error = %e, "Content watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&self.path, RecursiveMode::Recursive)?;
        tracing::info!(path = ?self.path, debounce_ms = self.debounce.as_millis() as u64, "Content watcher started");

        let debounce = self.debounce;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.recv() => break,
                    event = rx.recv() => {
                        if event.is_none() {
                            break;
                        }
                        // Wait for the burst to settle
                        loop {
                            match tokio::time::timeout(debounce, rx.recv()).await {
                                Ok(Some(())) => continue,
                                Ok(None) | Err(_) => break,
                            }
                        }
                        tracing::info!("Content change detected, reloading");
                        // Failures are logged and recorded by the orchestrator
                        let _ = orchestrator.reload(ReloadTrigger::Watch).await;
                    }
                }
            }
            tracing::debug!("Content watcher stopped");
        });

        Ok(watcher)
    }
}

fn is_content_change(event: &Event) -> bool {
    let relevant_kind = event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove();
    relevant_kind
        && event.paths.iter().any(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            )
        })
}
