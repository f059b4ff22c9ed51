//! Snapshot assembly.
//!
//! # Responsibilities
//! - Order posts newest first (per site and per tag)
//! - Partition tags into plain tags and series
//! - Validate every enabled feed's settings
//! - Render the enabled feeds
//!
//! # Design Decisions
//! - Pure function of its inputs: no clock, no I/O
//! - Any error discards the whole build; there is no partial snapshot

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use url::Url;

use crate::content::site::SiteConfig;
use crate::content::tag::{never_modified, split_series};
use crate::content::{Content, Post, Tag};
use crate::snapshot::{atom, opensearch, rss, sitemap, FeedKind, RenderedFeed, Snapshot};

/// The snapshot could not be built. The previous snapshot stays live.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("invalid base_url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("{feed} feed: {reason}")]
    InvalidFeedConfig { feed: FeedKind, reason: String },

    #[error("{first} and {second} feeds are both configured at {path}")]
    DuplicateFeedPath {
        path: String,
        first: FeedKind,
        second: FeedKind,
    },

    #[error("{feed} feed: render failed: {message}")]
    Render { feed: FeedKind, message: String },
}

impl BuildError {
    pub(crate) fn invalid(feed: FeedKind, reason: impl Into<String>) -> Self {
        Self::InvalidFeedConfig {
            feed,
            reason: reason.into(),
        }
    }

    pub fn identifier(&self) -> String {
        match self {
            Self::InvalidBaseUrl { .. } => "base_url".to_string(),
            Self::InvalidFeedConfig { feed, .. } | Self::Render { feed, .. } => feed.to_string(),
            Self::DuplicateFeedPath { path, .. } => path.clone(),
        }
    }
}

/// Everything a renderer needs, borrowed from the snapshot under
/// construction.
pub struct RenderContext<'a> {
    pub site: &'a SiteConfig,
    /// `site.base_url`, parsed and ending in `/`.
    pub base: &'a Url,
    /// Published posts, newest first.
    pub posts: &'a [Arc<Post>],
    pub tags: &'a [Tag],
    pub series: &'a [Tag],
    /// Latest post modification, epoch for an empty site.
    pub updated: DateTime<Utc>,
}

impl RenderContext<'_> {
    pub fn url(&self, path: &str) -> String {
        crate::content::urls::absolute(self.base, path)
    }
}

/// Build a snapshot for `generation` from validated content.
pub fn build_snapshot(content: Content, generation: u64) -> Result<Snapshot, BuildError> {
    let Content {
        site,
        tags,
        mut posts,
        links,
    } = content;

    let base = parse_base_url(&site.base_url)?;
    check_feed_paths(&site)?;

    posts.sort_by(newest_first);
    let tags: Vec<Tag> = tags
        .into_iter()
        .map(|mut tag| {
            tag.posts.sort_by(newest_first);
            tag
        })
        .collect();
    let (tags, series) = split_series(tags);

    let updated = posts
        .iter()
        .map(|post| post.modified)
        .max()
        .unwrap_or_else(never_modified);

    let ctx = RenderContext {
        site: &site,
        base: &base,
        posts: &posts,
        tags: &tags,
        series: &series,
        updated,
    };

    let mut feeds = Vec::with_capacity(FeedKind::ALL.len());
    if let Some(config) = &site.rss {
        feeds.push(finish(FeedKind::Rss, &config.url, rss::render(&ctx, config)?));
    }
    if let Some(config) = &site.atom {
        feeds.push(finish(FeedKind::Atom, &config.url, atom::render(&ctx, config)?));
    }
    if let Some(config) = &site.sitemap {
        feeds.push(finish(FeedKind::Sitemap, &config.url, sitemap::render(&ctx, config)?));
    }
    if let Some(config) = &site.opensearch {
        feeds.push(finish(
            FeedKind::Opensearch,
            &config.url,
            opensearch::render(&ctx, config)?,
        ));
    }

    Ok(Snapshot {
        generation,
        site,
        tags,
        series,
        posts,
        links,
        feeds,
    })
}

fn finish(kind: FeedKind, path: &str, body: Vec<u8>) -> RenderedFeed {
    RenderedFeed {
        kind,
        path: path.to_string(),
        body: body.into(),
    }
}

fn newest_first(a: &Arc<Post>, b: &Arc<Post>) -> std::cmp::Ordering {
    b.created.cmp(&a.created).then_with(|| a.slug.cmp(&b.slug))
}

fn parse_base_url(raw: &str) -> Result<Url, BuildError> {
    let invalid = |reason: String| BuildError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    // Relative joins drop the last segment unless the path ends in '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Every enabled feed needs an absolute path of its own.
fn check_feed_paths(site: &SiteConfig) -> Result<(), BuildError> {
    let configured = [
        (FeedKind::Rss, site.rss.as_ref().map(|c| c.url.as_str())),
        (FeedKind::Atom, site.atom.as_ref().map(|c| c.url.as_str())),
        (FeedKind::Sitemap, site.sitemap.as_ref().map(|c| c.url.as_str())),
        (FeedKind::Opensearch, site.opensearch.as_ref().map(|c| c.url.as_str())),
    ];

    let mut seen: HashMap<&str, FeedKind> = HashMap::new();
    for (kind, path) in configured {
        let Some(path) = path else { continue };

        if !path.starts_with('/') {
            return Err(BuildError::invalid(kind, format!("url {path:?} must start with '/'")));
        }
        if path.contains('?') || path.contains('#') || path.contains(char::is_whitespace) {
            return Err(BuildError::invalid(kind, format!("url {path:?} must be a plain path")));
        }
        if let Some(first) = seen.insert(path, kind) {
            return Err(BuildError::DuplicateFeedPath {
                path: path.to_string(),
                first,
                second: kind,
            });
        }
    }
    Ok(())
}
