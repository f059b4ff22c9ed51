//! Content snapshots.
//!
//! # Data Flow
//! ```text
//! Content (validated tags, posts, links, site config)
//!     → builder.rs (sort, partition, validate feed settings)
//!     → rss.rs / atom.rs / sitemap.rs / opensearch.rs (render payloads)
//!     → Snapshot (immutable)
//!     → handle.rs (published through an atomic pointer)
//! ```
//!
//! # Design Decisions
//! - A snapshot is built from scratch on every reload, never patched
//! - Feed payloads are plain bytes, rendered once per reload
//! - Timestamps inside payloads come from content, so identical input
//!   renders identical bytes

pub mod atom;
pub mod builder;
pub mod handle;
pub mod opensearch;
pub mod rss;
pub mod sitemap;
mod xml;

use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use serde::{Deserialize, Serialize};

use crate::content::{Link, Post, SiteConfig, Tag};

pub use builder::{build_snapshot, BuildError};
pub use handle::SnapshotHandle;

/// The four derived, servable artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Rss,
    Atom,
    Sitemap,
    Opensearch,
}

impl FeedKind {
    pub const ALL: [FeedKind; 4] = [
        FeedKind::Rss,
        FeedKind::Atom,
        FeedKind::Sitemap,
        FeedKind::Opensearch,
    ];

    /// MIME type the payload is served with.
    pub fn content_type(self) -> &'static str {
        match self {
            FeedKind::Rss => "application/rss+xml; charset=utf-8",
            FeedKind::Atom => "application/atom+xml; charset=utf-8",
            FeedKind::Sitemap => "application/xml; charset=utf-8",
            FeedKind::Opensearch => "application/opensearchdescription+xml; charset=utf-8",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FeedKind::Rss => "rss",
            FeedKind::Atom => "atom",
            FeedKind::Sitemap => "sitemap",
            FeedKind::Opensearch => "opensearch",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A feed kind paired with the path it is served at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedRoute {
    pub kind: FeedKind,
    pub path: String,
}

/// A rendered feed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeed {
    pub kind: FeedKind,
    pub path: String,
    pub body: Bytes,
}

/// Immutable bundle of validated content and rendered feeds.
#[derive(Debug)]
pub struct Snapshot {
    generation: u64,
    site: SiteConfig,
    tags: Vec<Tag>,
    series: Vec<Tag>,
    posts: Vec<Arc<Post>>,
    links: Vec<Link>,
    feeds: Vec<RenderedFeed>,
}

impl Snapshot {
    /// Monotonic reload counter this snapshot was built for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Plain tags, in source order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Series, in source order.
    pub fn series(&self) -> &[Tag] {
        &self.series
    }

    /// Published posts, newest first.
    pub fn posts(&self) -> &[Arc<Post>] {
        &self.posts
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Look up a tag or series by slug.
    pub fn tag(&self, slug: &str) -> Option<&Tag> {
        self.tags
            .iter()
            .chain(self.series.iter())
            .find(|tag| tag.slug == slug)
    }

    /// The payload for `kind`, or `None` when that feed is disabled.
    pub fn feed(&self, kind: FeedKind) -> Option<&RenderedFeed> {
        self.feeds.iter().find(|feed| feed.kind == kind)
    }

    /// Enabled feeds, in [`FeedKind::ALL`] order.
    pub fn feeds(&self) -> &[RenderedFeed] {
        &self.feeds
    }

    /// Route registration entries for the enabled feeds.
    pub fn routes(&self) -> Vec<FeedRoute> {
        self.feeds
            .iter()
            .map(|feed| FeedRoute {
                kind: feed.kind,
                path: feed.path.clone(),
            })
            .collect()
    }
}
