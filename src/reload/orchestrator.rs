//! Reload state machine.
//!
//! # States
//! - Idle: no reload running
//! - Building: loading, validating and rendering a candidate snapshot
//! - Swapping: republishing feed routes and storing the new snapshot
//! - Failed: the current attempt was abandoned; returns to Idle
//!
//! # State Transitions
//! ```text
//! Idle → Building: trigger (startup, webhook, admin, signal, watch)
//! Building → Swapping: candidate snapshot built
//! Building → Failed: load, validation or build error
//! Swapping → Idle: routes republished, snapshot stored
//! Swapping → Failed: route mutation refused, routes rolled back
//! Failed → Idle: failure recorded
//! ```
//!
//! # Design Decisions
//! - One reload at a time; overlapping triggers wait their turn
//! - The snapshot pointer is stored only after every route op succeeded
//! - A failed reload leaves the live snapshot and routes untouched
//! - Once triggered, a reload always finishes and returns to Idle, even if
//!   the caller stops waiting

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use serde::Serialize;
use tokio::sync::Mutex as ReloadGuard;
use tracing::Instrument;
use uuid::Uuid;

use crate::content::{Content, ContentSource};
use crate::observability::metrics;
use crate::reload::error::{ReloadError, ReloadFailure};
use crate::routing::{republish, RepublishSummary, RouteTable};
use crate::snapshot::{build_snapshot, FeedRoute, Snapshot, SnapshotHandle};

/// Reload phase.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReloadPhase {
    Idle = 0,
    Building = 1,
    Swapping = 2,
    Failed = 3,
}

impl From<u8> for ReloadPhase {
    fn from(val: u8) -> Self {
        match val {
            1 => ReloadPhase::Building,
            2 => ReloadPhase::Swapping,
            3 => ReloadPhase::Failed,
            _ => ReloadPhase::Idle,
        }
    }
}

/// What asked for the reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReloadTrigger {
    Startup,
    Webhook,
    Admin,
    Signal,
    Watch,
}

impl fmt::Display for ReloadTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReloadTrigger::Startup => "startup",
            ReloadTrigger::Webhook => "webhook",
            ReloadTrigger::Admin => "admin",
            ReloadTrigger::Signal => "signal",
            ReloadTrigger::Watch => "watch",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful reload.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadReport {
    pub reload_id: Uuid,
    pub trigger: ReloadTrigger,
    pub generation: u64,
    pub tags: usize,
    pub series: usize,
    pub posts: usize,
    pub feeds: Vec<FeedRoute>,
    pub routes: RepublishSummary,
    pub duration_ms: u64,
}

/// Snapshot of the orchestrator for status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadStatus {
    pub phase: ReloadPhase,
    pub generation: u64,
    pub source: String,
    pub last_failure: Option<ReloadFailure>,
}

/// Owns the write side of the snapshot handle and the route table.
pub struct ReloadOrchestrator {
    source: Arc<dyn ContentSource>,
    snapshot: SnapshotHandle,
    routes: Arc<RouteTable>,
    guard: ReloadGuard<()>,
    phase: AtomicU8,
    last_failure: Mutex<Option<ReloadFailure>>,
}

impl ReloadOrchestrator {
    pub fn new(source: Arc<dyn ContentSource>, snapshot: SnapshotHandle, routes: Arc<RouteTable>) -> Self {
        Self {
            source,
            snapshot,
            routes,
            guard: ReloadGuard::new(()),
            phase: AtomicU8::new(ReloadPhase::Idle as u8),
            last_failure: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> &SnapshotHandle {
        &self.snapshot
    }

    pub fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }

    pub fn phase(&self) -> ReloadPhase {
        ReloadPhase::from(self.phase.load(Ordering::Acquire))
    }

    pub fn last_failure(&self) -> Option<ReloadFailure> {
        self.last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn status(&self) -> ReloadStatus {
        ReloadStatus {
            phase: self.phase(),
            generation: self.snapshot.generation(),
            source: self.source.describe(),
            last_failure: self.last_failure(),
        }
    }

    /// Rebuild content from the source and publish it.
    ///
    /// Waits for any reload already in progress, then runs to completion.
    /// The pipeline runs on its own task, so dropping the returned future
    /// (request timeout, client disconnect) does not abandon it midway.
    pub async fn reload(self: &Arc<Self>, trigger: ReloadTrigger) -> Result<ReloadReport, ReloadError> {
        let orchestrator = Arc::clone(self);
        let task = tokio::spawn(async move {
            let _running = orchestrator.guard.lock().await;

            let reload_id = Uuid::new_v4();
            let span = tracing::info_span!("reload", %reload_id, %trigger);
            orchestrator.run(reload_id, trigger).instrument(span).await
        });

        match task.await {
            Ok(result) => result,
            Err(e) => Err(self.fail(ReloadError::Aborted(e.to_string()), Instant::now())),
        }
    }

    async fn run(&self, reload_id: Uuid, trigger: ReloadTrigger) -> Result<ReloadReport, ReloadError> {
        let start = Instant::now();
        let generation = self.snapshot.generation() + 1;

        self.set_phase(ReloadPhase::Building);
        tracing::info!(generation, source = %self.source.describe(), "Reload started");

        let candidate = match self.build(generation).await {
            Ok(snapshot) => snapshot,
            Err(e) => return Err(self.fail(e, start)),
        };

        self.set_phase(ReloadPhase::Swapping);
        let current = self.snapshot.load();
        let routes = match republish(&self.routes, current.as_deref(), &candidate) {
            Ok(summary) => summary,
            Err(e) => return Err(self.fail(e.into(), start)),
        };

        let candidate = Arc::new(candidate);
        self.snapshot.store(Arc::clone(&candidate));
        *self.last_failure.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.set_phase(ReloadPhase::Idle);

        metrics::record_reload("success", start);
        metrics::record_generation(generation);

        let report = ReloadReport {
            reload_id,
            trigger,
            generation,
            tags: candidate.tags().len(),
            series: candidate.series().len(),
            posts: candidate.posts().len(),
            feeds: candidate.routes(),
            routes,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            generation,
            tags = report.tags,
            series = report.series,
            posts = report.posts,
            feeds = report.feeds.len(),
            duration_ms = report.duration_ms,
            "Reload complete"
        );
        Ok(report)
    }

    /// Load, validate and render on a blocking thread.
    async fn build(&self, generation: u64) -> Result<Snapshot, ReloadError> {
        let source = Arc::clone(&self.source);
        tokio::task::spawn_blocking(move || -> Result<Snapshot, ReloadError> {
            let raw = source.load()?;
            let content = Content::from_raw(raw)?;
            Ok(build_snapshot(content, generation)?)
        })
        .await
        .map_err(|e| ReloadError::Aborted(e.to_string()))?
    }

    fn fail(&self, err: ReloadError, start: Instant) -> ReloadError {
        self.set_phase(ReloadPhase::Failed);
        tracing::error!(
            category = err.category(),
            identifier = %err.identifier(),
            error = %err,
            "Reload failed, keeping current snapshot"
        );
        *self.last_failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(ReloadFailure::from(&err));
        metrics::record_reload("failure", start);
        self.set_phase(ReloadPhase::Idle);
        err
    }

    fn set_phase(&self, phase: ReloadPhase) {
        let previous = ReloadPhase::from(self.phase.swap(phase as u8, Ordering::AcqRel));
        if previous != phase {
            tracing::debug!(from = ?previous, to = ?phase, "Reload phase changed");
        }
    }
}

impl fmt::Debug for ReloadOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadOrchestrator")
            .field("source", &self.source.describe())
            .field("phase", &self.phase())
            .field("generation", &self.snapshot.generation())
            .finish()
    }
}
