//! Content sources.
//!
//! A source hands the reload pipeline a fresh set of raw records each time
//! it is asked. The filesystem layout is:
//!
//! ```text
//! <data_dir>/meta/site.yaml     site metadata and feed settings
//! <data_dir>/meta/tags.yaml     ordered list of tags and series
//! <data_dir>/meta/links.yaml    optional list of links
//! <data_dir>/posts/*.yaml       one post per file
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::content::error::LoadError;
use crate::content::link::Link;
use crate::content::post::Post;
use crate::content::site::SiteConfig;
use crate::content::tag::Tag;

/// Unvalidated records straight from the source.
#[derive(Debug, Clone)]
pub struct RawContent {
    pub site: SiteConfig,
    pub tags: Vec<Tag>,
    pub posts: Vec<Post>,
    pub links: Vec<Link>,
}

/// Anything the reload pipeline can read content from.
///
/// Called from a blocking thread, never from an async task.
pub trait ContentSource: Send + Sync + 'static {
    fn load(&self) -> Result<RawContent, LoadError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Reads content from a data directory on disk.
#[derive(Debug, Clone)]
pub struct FsContentSource {
    root: PathBuf,
}

impl FsContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn meta(&self, name: &str) -> PathBuf {
        self.root.join("meta").join(name)
    }

    fn load_posts(&self) -> Result<Vec<Post>, LoadError> {
        let dir = self.root.join("posts");
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|source| LoadError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoadError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            let is_yaml = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            if is_yaml && path.is_file() {
                files.push(path);
            }
        }
        // Directory order is platform dependent.
        files.sort();

        files.iter().map(|path| read_yaml(path)).collect()
    }
}

impl ContentSource for FsContentSource {
    fn load(&self) -> Result<RawContent, LoadError> {
        let site = read_yaml(&self.meta("site.yaml"))?;
        let tags = read_yaml(&self.meta("tags.yaml"))?;

        let links_path = self.meta("links.yaml");
        let links = if links_path.exists() {
            read_yaml(&links_path)?
        } else {
            Vec::new()
        };

        let posts = self.load_posts()?;

        Ok(RawContent {
            site,
            tags,
            posts,
            links,
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
