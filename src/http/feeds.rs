//! Feed endpoint dispatch.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::http::server::AppState;
use crate::observability::metrics;

pub const X_SNAPSHOT_GENERATION: &str = "x-snapshot-generation";

/// Fallback handler: serve whatever feed is registered at the request path.
pub async fn serve_feed(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let path = uri.path();
    let Some(entry) = state.routes.dispatch(path) else {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
            "Method Not Allowed",
        )
            .into_response();
    }

    metrics::record_feed_request(entry.kind.name());
    tracing::debug!(path = %path, kind = %entry.kind, generation = entry.generation, "Serving feed");

    let body = if method == Method::HEAD {
        Body::empty()
    } else {
        Body::from(entry.body.clone())
    };

    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(entry.kind.content_type()));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(entry.body.len()));
    headers.insert(X_SNAPSHOT_GENERATION, HeaderValue::from(entry.generation));
    response
}
