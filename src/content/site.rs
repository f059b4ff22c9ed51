//! Site metadata and per-feed settings, read from `meta/site.yaml`.
//!
//! An absent feed section disables that feed. Checking that a present
//! section is well formed is left to the snapshot builder, so a bad value
//! fails the reload instead of the parse.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    /// Absolute URL of the site root, e.g. `https://example.com/`.
    pub base_url: String,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub author: Option<Author>,

    #[serde(default)]
    pub keywords: String,

    #[serde(default)]
    pub description: String,

    /// Site-relative search page, used by the OpenSearch description.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    #[serde(default)]
    pub rss: Option<FeedConfig>,

    #[serde(default)]
    pub atom: Option<FeedConfig>,

    #[serde(default)]
    pub sitemap: Option<SitemapConfig>,

    #[serde(default)]
    pub opensearch: Option<OpensearchConfig>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_search_url() -> String {
    "/search.html".to_string()
}

impl SiteConfig {
    /// A site with every feed disabled.
    pub fn new(title: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: String::new(),
            base_url: base_url.into(),
            language: default_language(),
            author: None,
            keywords: String::new(),
            description: String::new(),
            search_url: default_search_url(),
            rss: None,
            atom: None,
            sitemap: None,
            opensearch: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// RSS and Atom settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Path the feed is served at.
    pub url: String,

    /// Feed title, defaults to the site title.
    #[serde(default)]
    pub title: Option<String>,

    /// Number of newest posts to include.
    #[serde(default = "default_feed_size")]
    pub size: usize,
}

fn default_feed_size() -> usize {
    10
}

impl FeedConfig {
    pub fn at(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            size: default_feed_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SitemapConfig {
    pub url: String,

    /// Also list tag and series pages.
    #[serde(default = "default_true")]
    pub enable_tag: bool,

    /// Priority of non-post pages.
    #[serde(default = "default_priority")]
    pub priority: f64,

    #[serde(default = "default_post_priority")]
    pub post_priority: f64,

    #[serde(default = "default_changefreq")]
    pub changefreq: String,

    #[serde(default = "default_post_changefreq")]
    pub post_changefreq: String,
}

fn default_true() -> bool {
    true
}

fn default_priority() -> f64 {
    0.6
}

fn default_post_priority() -> f64 {
    0.9
}

fn default_changefreq() -> String {
    "daily".to_string()
}

fn default_post_changefreq() -> String {
    "monthly".to_string()
}

impl SitemapConfig {
    pub fn at(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            enable_tag: true,
            priority: default_priority(),
            post_priority: default_post_priority(),
            changefreq: default_changefreq(),
            post_changefreq: default_post_changefreq(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OpensearchConfig {
    pub url: String,

    /// At most 16 characters.
    pub short_name: String,

    #[serde(default)]
    pub long_name: Option<String>,

    /// Falls back to the site title when empty.
    #[serde(default)]
    pub description: String,

    /// Icon URL.
    #[serde(default)]
    pub image: Option<String>,
}

impl OpensearchConfig {
    pub fn at(url: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            short_name: short_name.into(),
            long_name: None,
            description: String::new(),
            image: None,
        }
    }
}
