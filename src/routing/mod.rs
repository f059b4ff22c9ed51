//! Feed routing.
//!
//! # Data Flow
//! ```text
//! Incoming feed request (path)
//!     → table.rs (exact path lookup)
//!     → RouteEntry (kind, payload, generation) or NoMatch
//!
//! Reload:
//!     old Snapshot + new Snapshot
//!     → republish.rs (RoutePlan: add, replace, remove)
//!     → table.rs mutations, reverted on the first refusal
//! ```
//!
//! # Design Decisions
//! - Fixed routes (webhook, admin, health) live in the axum router; only
//!   feed paths live in the table
//! - A path served by both snapshots is replaced in place, never removed
//! - Exact matching only: feed paths are literal

pub mod republish;
pub mod table;

pub use republish::{republish, RepublishSummary, RouteOp, RoutePlan};
pub use table::{RouteEntry, RouteError, RouteTable};
