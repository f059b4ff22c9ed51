//! Self-hosted blog engine: content snapshots, feeds and atomic route
//! republishing.

pub mod admin;
pub mod config;
pub mod content;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod reload;
pub mod routing;
pub mod snapshot;

pub use config::schema::ServerConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
pub use reload::{ReloadOrchestrator, ReloadTrigger};
pub use snapshot::{Snapshot, SnapshotHandle};
