//! Admin API.
//!
//! Read-only views of the live snapshot plus a manual reload trigger, all
//! behind a bearer key. Mounted under `admin.path_prefix`.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/tags", get(get_tags))
        .route("/tags/{slug}", get(get_tag))
        .route("/series", get(get_series))
        .route("/links", get(get_links))
        .route("/routes", get(get_routes))
        .route("/reload", post(post_reload))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
