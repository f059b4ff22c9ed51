//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use tokio::net::TcpListener;

use blog_server::config::ServerConfig;
use blog_server::content::FsContentSource;
use blog_server::http::{AppState, HttpServer};
use blog_server::lifecycle::Shutdown;

pub const RSS_AND_ATOM: &str = "\
rss:
  url: /rss.xml
atom:
  url: /atom.xml
";

pub const RSS_AND_SITEMAP: &str = "\
rss:
  url: /rss.xml
sitemap:
  url: /sitemap.xml
";

pub const TAGS: &str = "\
- slug: rust
  title: Rust
  content: Systems programming
  color: '#dea584'
- slug: web
  title: Web Development
  content: Browsers and servers
- slug: tour
  title: A Tour
  content: A series about the tour
  series: true
";

/// A content directory on disk, removed when dropped.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    /// Site with `feeds` (a YAML fragment) plus a small taxonomy and two posts.
    pub fn blog(feeds: &str) -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        fixture.set_feeds(feeds);
        fixture.write("meta/tags.yaml", TAGS);
        fixture.write(
            "meta/links.yaml",
            "- text: Rust\n  url: https://www.rust-lang.org/\n",
        );
        fixture.write(
            "posts/first.yaml",
            "\
slug: first
title: First Post
summary: Hello & welcome
tags: [rust, tour]
created: 2024-01-01T09:00:00Z
modified: 2024-01-02T09:00:00Z
",
        );
        fixture.write(
            "posts/second.yaml",
            "\
slug: second
title: Second Post
tags: [rust, web]
created: 2024-02-01T09:00:00Z
modified: 2024-02-01T09:00:00Z
",
        );
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn source(&self) -> Arc<FsContentSource> {
        Arc::new(FsContentSource::new(self.root()))
    }

    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.root().join(rel)).unwrap();
    }

    /// Rewrite `meta/site.yaml` with a different feed section.
    pub fn set_feeds(&self, feeds: &str) {
        self.write(
            "meta/site.yaml",
            &format!(
                "title: Test Blog\nsubtitle: Notes\nbase_url: https://blog.example.com\nauthor:\n  name: Ada\n{feeds}"
            ),
        );
    }
}

/// Server config with admin enabled and the given data dir.
pub fn server_config(fixture: &Fixture) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.content.data_dir = fixture.root().to_path_buf();
    config.admin.enabled = true;
    config.admin.api_key = "test-key".to_string();
    config
}

pub fn app_state(config: ServerConfig, fixture: &Fixture) -> AppState {
    AppState::new(config, fixture.source())
}

/// Serve `state` on an ephemeral port until the returned `Shutdown` fires.
pub async fn start_server(state: AppState) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        HttpServer::new(state).run(listener, rx).await.unwrap();
    });

    (addr, shutdown)
}
