//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned and propagated)
//!     → host.rs (unknown hosts rejected when domains are configured)
//!     → fixed routes: /healthz, webhook.rs, admin API
//!     → everything else: feeds.rs (route table lookup)
//! ```

pub mod feeds;
pub mod host;
pub mod request;
pub mod server;
pub mod webhook;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
