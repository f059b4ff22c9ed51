//! Reload pipeline.
//!
//! # Data Flow
//! ```text
//! Trigger (startup, webhook, admin API, SIGHUP, file watcher)
//!     → orchestrator.rs (single-flight guard)
//!     → content source → validation → snapshot builder   [blocking thread]
//!     → routing::republish (route table mutations)
//!     → SnapshotHandle::store (atomic pointer swap)
//! ```
//!
//! # Design Decisions
//! - Nothing visible to readers changes until the very last step
//! - Errors are reported to the caller and kept for status queries, never
//!   propagated as a crash

pub mod error;
pub mod orchestrator;
pub mod watcher;

pub use error::{ReloadError, ReloadFailure};
pub use orchestrator::{ReloadOrchestrator, ReloadPhase, ReloadReport, ReloadStatus, ReloadTrigger};
pub use watcher::ContentWatcher;
