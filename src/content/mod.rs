//! Content loading subsystem.
//!
//! # Data Flow
//! ```text
//! data directory (meta/*.yaml, posts/*.yaml)
//!     → source.rs (read & deserialize raw records)
//!     → tag.rs / post.rs / link.rs (field validation, derived fields)
//!     → aggregate.rs (tag → posts cross-references, freshness)
//!     → Content (validated, ready for the snapshot builder)
//! ```
//!
//! # Design Decisions
//! - Validation is fail-fast: the first bad record aborts the whole load
//! - Derived fields are computed here and never read from disk
//! - Nothing in this module touches the live snapshot

pub mod aggregate;
pub mod error;
pub mod link;
pub mod post;
pub mod site;
pub mod source;
pub mod tag;
pub mod urls;

pub use aggregate::{aggregate, Aggregated};
pub use error::{LoadError, ValidationError};
pub use link::Link;
pub use post::Post;
pub use site::SiteConfig;
pub use source::{ContentSource, FsContentSource, RawContent};
pub use tag::Tag;

/// Fully validated and cross-referenced content, the input of the snapshot
/// builder.
#[derive(Debug, Clone)]
pub struct Content {
    pub site: SiteConfig,
    pub tags: Vec<Tag>,
    pub posts: Vec<std::sync::Arc<Post>>,
    pub links: Vec<Link>,
}

impl Content {
    /// Run the whole validation pipeline over raw records.
    pub fn from_raw(raw: RawContent) -> Result<Self, ValidationError> {
        let tags = tag::load_tags(raw.tags)?;
        let posts = post::load_posts(raw.posts)?;
        let links = link::load_links(raw.links)?;
        let Aggregated { tags, posts } = aggregate(tags, posts)?;

        Ok(Self {
            site: raw.site,
            tags,
            posts,
            links,
        })
    }
}
