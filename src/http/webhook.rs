//! Reload webhook.
//!
//! `POST {webhook.path}` runs a reload to completion and answers with the
//! outcome. When a secret is configured the caller must present it in
//! `X-Webhook-Secret`.
//!
//! A reload that outlasts `timeouts.request_secs` answers 408, but the
//! reload itself keeps running and is published when it finishes. Check
//! `GET {admin}/status` for the result.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::reload::{ReloadFailure, ReloadReport, ReloadTrigger};
use crate::snapshot::FeedRoute;

pub const X_WEBHOOK_SECRET: &str = "x-webhook-secret";

/// Body of a successful webhook response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub generation: u64,
    pub tags: usize,
    pub series: usize,
    pub posts: usize,
    pub feeds: Vec<FeedRoute>,
}

impl From<ReloadReport> for WebhookResponse {
    fn from(report: ReloadReport) -> Self {
        Self {
            generation: report.generation,
            tags: report.tags,
            series: report.series,
            posts: report.posts,
            feeds: report.feeds,
        }
    }
}

pub async fn reload_webhook(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(secret) = &state.config.webhook.secret {
        let presented = headers.get(X_WEBHOOK_SECRET).and_then(|v| v.to_str().ok());
        if presented != Some(secret.as_str()) {
            tracing::warn!("Webhook called without a valid secret");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    match state.orchestrator.reload(ReloadTrigger::Webhook).await {
        Ok(report) => (StatusCode::OK, Json(WebhookResponse::from(report))).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(ReloadFailure::from(&e))).into_response(),
    }
}
