use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::content::{Link, Tag};
use crate::http::server::AppState;
use crate::reload::{ReloadFailure, ReloadPhase, ReloadTrigger};
use crate::snapshot::FeedRoute;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub phase: ReloadPhase,
    pub generation: u64,
    pub source: String,
    pub posts: usize,
    pub tags: usize,
    pub series: usize,
    pub last_failure: Option<ReloadFailure>,
}

/// A tag or series as listed by the admin API.
#[derive(Debug, Serialize)]
pub struct TagSummary {
    pub slug: String,
    pub title: String,
    pub permalink: String,
    pub series: bool,
    pub posts: usize,
    pub modified: chrono::DateTime<chrono::Utc>,
}

impl From<&Tag> for TagSummary {
    fn from(tag: &Tag) -> Self {
        Self {
            slug: tag.slug.clone(),
            title: tag.title.clone(),
            permalink: tag.permalink.clone(),
            series: tag.series,
            posts: tag.posts.len(),
            modified: tag.modified,
        }
    }
}

/// A tag with its content and the slugs of its posts.
#[derive(Debug, Serialize)]
pub struct TagDetail {
    #[serde(flatten)]
    pub summary: TagSummary,
    pub color: Option<String>,
    pub content: String,
    pub keywords: String,
    pub post_slugs: Vec<String>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let status = state.orchestrator.status();
    let (posts, tags, series) = state
        .snapshot
        .load()
        .map(|s| (s.posts().len(), s.tags().len(), s.series().len()))
        .unwrap_or_default();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        phase: status.phase,
        generation: status.generation,
        source: status.source,
        posts,
        tags,
        series,
        last_failure: status.last_failure,
    })
}

pub async fn get_tags(State(state): State<AppState>) -> Json<Vec<TagSummary>> {
    let tags = state
        .snapshot
        .load()
        .map(|s| s.tags().iter().map(TagSummary::from).collect())
        .unwrap_or_default();
    Json(tags)
}

pub async fn get_series(State(state): State<AppState>) -> Json<Vec<TagSummary>> {
    let series = state
        .snapshot
        .load()
        .map(|s| s.series().iter().map(TagSummary::from).collect())
        .unwrap_or_default();
    Json(series)
}

pub async fn get_tag(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let Some(snapshot) = state.snapshot.load() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match snapshot.tag(&slug) {
        Some(tag) => Json(TagDetail {
            summary: TagSummary::from(tag),
            color: tag.color.clone(),
            content: tag.content.clone(),
            keywords: tag.keywords.clone(),
            post_slugs: tag.posts.iter().map(|p| p.slug.clone()).collect(),
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn get_links(State(state): State<AppState>) -> Json<Vec<Link>> {
    let links = state
        .snapshot
        .load()
        .map(|s| s.links().to_vec())
        .unwrap_or_default();
    Json(links)
}

/// Routes currently registered in the live table.
pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<FeedRoute>> {
    Json(state.routes.routes())
}

pub async fn post_reload(State(state): State<AppState>) -> Response {
    match state.orchestrator.reload(ReloadTrigger::Admin).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(ReloadFailure::from(&e))).into_response(),
    }
}
