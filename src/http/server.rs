//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, response headers,
//!   host allowlist, panic recovery)
//! - Mount fixed routes (health, webhook, admin API)
//! - Dispatch every other request to the live feed route table
//! - Serve until shutdown is triggered

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request, Response, StatusCode};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::config::ServerConfig;
use crate::content::ContentSource;
use crate::http::feeds::serve_feed;
use crate::http::host::{host_filter, HostAllowlist};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::webhook::reload_webhook;
use crate::lifecycle::Shutdown;
use crate::reload::ReloadOrchestrator;
use crate::routing::RouteTable;
use crate::snapshot::SnapshotHandle;

pub const HEALTH_PATH: &str = "/healthz";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub snapshot: SnapshotHandle,
    pub routes: Arc<RouteTable>,
    pub orchestrator: Arc<ReloadOrchestrator>,
}

impl AppState {
    /// Wire the snapshot handle, route table and orchestrator together.
    /// Nothing is loaded yet; call `orchestrator.reload` to publish content.
    pub fn new(config: ServerConfig, source: Arc<dyn ContentSource>) -> Self {
        let routes = Arc::new(reserved_routes(&config));
        let snapshot = SnapshotHandle::new();
        let orchestrator = Arc::new(ReloadOrchestrator::new(
            source,
            snapshot.clone(),
            Arc::clone(&routes),
        ));

        Self {
            config: Arc::new(config),
            snapshot,
            routes,
            orchestrator,
        }
    }
}

/// A route table that refuses feed paths owned by fixed routes.
pub fn reserved_routes(config: &ServerConfig) -> RouteTable {
    let mut table = RouteTable::new().reserve(HEALTH_PATH, "health check");
    if config.webhook.enabled {
        table = table.reserve(config.webhook.path.clone(), "reload webhook");
    }
    if config.admin.enabled {
        table = table.reserve_prefix(config.admin.path_prefix.clone(), "admin api");
    }
    table
}

/// HTTP server for the blog.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        let config = Arc::clone(&state.config);

        let mut router = Router::new().route(HEALTH_PATH, get(health));

        if config.webhook.enabled {
            router = router.route(&config.webhook.path, post(reload_webhook));
        }
        if config.admin.enabled {
            let prefix = config.admin.path_prefix.trim_end_matches('/');
            router = router.nest(prefix, admin::admin_router(state.clone()));
        }

        let router = router.fallback(serve_feed).with_state(state);
        Self::with_middleware(router, &config)
    }

    /// Wrap a router in the server's middleware stack.
    pub fn with_middleware(mut router: Router, config: &ServerConfig) -> Router {
        router = router.layer(CatchPanicLayer::custom(panic_response));

        for (name, value) in &config.headers {
            match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                (Ok(name), Ok(value)) => {
                    router = router.layer(SetResponseHeaderLayer::overriding(name, value));
                }
                _ => tracing::warn!(header = %name, "Skipping invalid response header"),
            }
        }

        let allowlist = HostAllowlist::new(&config.domains);
        if !allowlist.is_empty() {
            router = router.layer(middleware::from_fn_with_state(allowlist, host_filter));
        }

        router
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request.request_id(),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// The assembled router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// shutdown is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(Shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health() -> &'static str {
    "ok"
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let message = err
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %message, "Handler panicked");

    let mut response = Response::new(Body::from("internal server error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
