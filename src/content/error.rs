//! Content error types.

use std::path::PathBuf;

/// A record failed validation. Always fatal to the current load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{file}[{index}].{field}: {reason}")]
    MissingField {
        file: &'static str,
        index: usize,
        field: &'static str,
        reason: &'static str,
    },

    /// Two tags share a slug.
    #[error("duplicate tag slug: {slug}")]
    DuplicateSlug { slug: String },

    /// Two posts share a slug.
    #[error("duplicate post slug: {slug}")]
    DuplicatePost { slug: String },

    /// A post references a tag that is not in the taxonomy. `post` is the
    /// post's slug, `index` its position in the loaded post list.
    #[error("posts[{post}].tags: unknown tag {slug} (post #{index})")]
    UnknownTag { index: usize, post: String, slug: String },
}

impl ValidationError {
    pub(crate) fn empty(file: &'static str, index: usize, field: &'static str) -> Self {
        Self::MissingField {
            file,
            index,
            field,
            reason: "empty",
        }
    }

    /// The offending record or field, for structured error reports.
    pub fn identifier(&self) -> String {
        match self {
            Self::MissingField { file, index, field, .. } => format!("{file}[{index}].{field}"),
            Self::DuplicateSlug { slug } | Self::DuplicatePost { slug } => slug.clone(),
            Self::UnknownTag { post, .. } => format!("posts[{post}].tags"),
        }
    }
}

/// The content source could not be read at all.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl LoadError {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}
