//! Logging and metrics.
//!
//! # Data Flow
//! ```text
//! HTTP requests  ── request span (x-request-id) ──┐
//! Reloads        ── reload span (reload_id)  ─────┼─▶ logging.rs ─▶ stdout (pretty | json)
//!                                                 │
//! Reload outcome, generation, feed hits ──────────┴─▶ metrics.rs ─▶ Prometheus listener
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` wins over `observability.log_level`
//! - The Prometheus listener only starts when `metrics_enabled` is set;
//!   the recording helpers are no-ops otherwise

pub mod logging;
pub mod metrics;
