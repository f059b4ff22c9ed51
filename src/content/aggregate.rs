//! Tag ↔ post cross-referencing.
//!
//! # Responsibilities
//! - Attach every published post to each tag it references
//! - Compute each tag's freshness (`modified`)
//! - Drop drafts from the published post list
//!
//! # Design Decisions
//! - One pass over posts with a slug → tag index map: O(tags + refs)
//! - Tags without posts are valid and keep the epoch timestamp
//! - No ordering is imposed here; the snapshot builder sorts

use std::collections::HashMap;
use std::sync::Arc;

use crate::content::error::ValidationError;
use crate::content::post::Post;
use crate::content::tag::Tag;

/// Output of [`aggregate`].
#[derive(Debug, Clone)]
pub struct Aggregated {
    pub tags: Vec<Tag>,
    /// Published posts only, in source order.
    pub posts: Vec<Arc<Post>>,
}

/// Cross-reference validated tags with validated posts.
///
/// A post naming a tag slug that does not exist fails the whole load, even
/// when the post is a draft.
pub fn aggregate(mut tags: Vec<Tag>, posts: Vec<Arc<Post>>) -> Result<Aggregated, ValidationError> {
    let index: HashMap<String, usize> = tags
        .iter()
        .enumerate()
        .map(|(i, tag)| (tag.slug.clone(), i))
        .collect();

    let mut published = Vec::with_capacity(posts.len());

    for (post_index, post) in posts.into_iter().enumerate() {
        for slug in &post.tags {
            let tag_index = *index.get(slug).ok_or_else(|| ValidationError::UnknownTag {
                index: post_index,
                post: post.slug.clone(),
                slug: slug.clone(),
            })?;

            if post.draft {
                continue;
            }

            let tag = &mut tags[tag_index];
            if post.modified > tag.modified {
                tag.modified = post.modified;
            }
            // A post listing the same tag twice is attached once.
            if !tag.posts.iter().any(|p| Arc::ptr_eq(p, &post)) {
                tag.posts.push(Arc::clone(&post));
            }
        }

        if !post.draft {
            published.push(post);
        }
    }

    tracing::debug!(
        tags = tags.len(),
        posts = published.len(),
        "Content aggregated"
    );

    Ok(Aggregated {
        tags,
        posts: published,
    })
}
