//! Post records.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::error::ValidationError;
use crate::content::urls;

const FILE: &str = "posts";

/// A published (or draft) post as read from `posts/*.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Post {
    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Slugs of the tags this post belongs to.
    #[serde(default)]
    pub tags: Vec<String>,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,

    /// Drafts are validated but never published.
    #[serde(default)]
    pub draft: bool,

    #[serde(skip_deserializing)]
    pub permalink: String,
}

impl Post {
    /// Build a post created and modified at the same instant.
    pub fn new(slug: impl Into<String>, title: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            summary: None,
            tags: Vec::new(),
            created: at,
            modified: at,
            draft: false,
            permalink: String::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    fn sanitize(&mut self, index: usize) -> Result<(), ValidationError> {
        if self.slug.is_empty() {
            return Err(ValidationError::empty(FILE, index, "slug"));
        }
        if self.title.is_empty() {
            return Err(ValidationError::empty(FILE, index, "title"));
        }
        if self.modified < self.created {
            return Err(ValidationError::MissingField {
                file: FILE,
                index,
                field: "modified",
                reason: "earlier than created",
            });
        }

        self.permalink = urls::post_url(&self.slug);
        Ok(())
    }
}

/// Validate raw posts and freeze them behind `Arc` so tags can share them.
pub fn load_posts(mut posts: Vec<Post>) -> Result<Vec<Arc<Post>>, ValidationError> {
    for (index, post) in posts.iter_mut().enumerate() {
        post.sanitize(index)?;
    }

    let mut seen = HashSet::with_capacity(posts.len());
    for post in &posts {
        if !seen.insert(post.slug.as_str()) {
            return Err(ValidationError::DuplicatePost {
                slug: post.slug.clone(),
            });
        }
    }

    Ok(posts.into_iter().map(Arc::new).collect())
}
