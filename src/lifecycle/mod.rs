//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Metrics → Bind → First reload → Watcher/signals → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → server drains, watcher stops
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Trigger content reload
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then content, then listeners serve
//! - One broadcast channel stops every background task

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
