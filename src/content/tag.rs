//! Taxonomy loading.
//!
//! The tag system covers both plain tags and series: a tag with
//! `series: true` is a topical collection, everything else is a label.
//! Both go through the same validation.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::error::ValidationError;
use crate::content::post::Post;
use crate::content::urls;

const FILE: &str = "tags";

/// A taxonomy entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tag {
    /// Unique name, used in URLs.
    #[serde(default)]
    pub slug: String,

    /// Display name.
    #[serde(default)]
    pub title: String,

    /// Tag color. `None` inherits from the parent container; an explicit
    /// empty string is kept as is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Description of the tag.
    #[serde(default)]
    pub content: String,

    /// Whether this tag is a series.
    #[serde(default)]
    pub series: bool,

    /// Lowercased title for case-insensitive lookup.
    #[serde(skip_deserializing)]
    pub search_title: String,

    /// Content of the keywords meta tag.
    #[serde(skip_deserializing)]
    pub keywords: String,

    /// Link to the first page of the tag listing.
    #[serde(skip_deserializing)]
    pub permalink: String,

    /// Posts carrying this tag, filled in by the aggregator.
    #[serde(skip)]
    pub posts: Vec<Arc<Post>>,

    /// Latest modification among `posts`, epoch when there are none.
    #[serde(skip_deserializing, default = "never_modified")]
    pub modified: DateTime<Utc>,
}

/// The Unix epoch, used as "never modified".
pub(crate) fn never_modified() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

impl Tag {
    /// Build a tag from its source fields.
    pub fn new(slug: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            color: None,
            content: content.into(),
            series: false,
            search_title: String::new(),
            keywords: String::new(),
            permalink: String::new(),
            posts: Vec::new(),
            modified: never_modified(),
        }
    }

    /// Mark this tag as a series.
    pub fn into_series(mut self) -> Self {
        self.series = true;
        self
    }

    /// Check required fields and compute the derived ones.
    fn sanitize(&mut self, index: usize) -> Result<(), ValidationError> {
        if self.slug.is_empty() {
            return Err(ValidationError::empty(FILE, index, "slug"));
        }
        if self.title.is_empty() {
            return Err(ValidationError::empty(FILE, index, "title"));
        }
        if self.content.is_empty() {
            return Err(ValidationError::empty(FILE, index, "content"));
        }

        self.posts = Vec::new();
        self.modified = never_modified();
        self.permalink = urls::tag_url(&self.slug, 1);

        self.keywords = self.title.clone();
        if self.title != self.slug {
            self.keywords.push(',');
            self.keywords.push_str(&self.slug);
        }

        self.search_title = self.title.to_lowercase();

        Ok(())
    }
}

/// Validate a raw tag list.
///
/// Per-record checks run first, in source order; the duplicate check only
/// runs once every record is individually valid.
pub fn load_tags(mut tags: Vec<Tag>) -> Result<Vec<Tag>, ValidationError> {
    for (index, tag) in tags.iter_mut().enumerate() {
        tag.sanitize(index)?;
    }

    check_duplicates(&tags)?;

    Ok(tags)
}

fn check_duplicates(tags: &[Tag]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(tags.len());
    for tag in tags {
        if !seen.insert(tag.slug.as_str()) {
            return Err(ValidationError::DuplicateSlug {
                slug: tag.slug.clone(),
            });
        }
    }
    Ok(())
}

/// Split the taxonomy into plain tags and series, keeping source order.
pub fn split_series(tags: Vec<Tag>) -> (Vec<Tag>, Vec<Tag>) {
    tags.into_iter().partition(|tag| !tag.series)
}
