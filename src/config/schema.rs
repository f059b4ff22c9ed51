//! Configuration schema definitions.
//!
//! This module defines the server configuration. Content (site metadata,
//! tags, posts, feed settings) lives in the data directory and is reloaded
//! at runtime; everything here is fixed for the life of the process.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the blog server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where content is read from and how changes are picked up.
    pub content: ContentConfig,

    /// Reload webhook.
    pub webhook: WebhookConfig,

    /// Admin API.
    pub admin: AdminConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Extra headers set on every response.
    pub headers: BTreeMap<String, String>,

    /// Host names the server answers for, e.g. `blog.example.com` or
    /// `*.example.com`. Empty accepts any `Host`.
    pub domains: Vec<String>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Content directory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Root of the `meta/` and `posts/` tree.
    pub data_dir: PathBuf,

    /// Reload automatically when files under `data_dir` change.
    pub watch: bool,

    /// Quiet period before a watched change triggers a reload.
    pub watch_debounce_ms: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            watch: false,
            watch_debounce_ms: 500,
        }
    }
}

/// Reload webhook configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Enable the reload webhook.
    pub enabled: bool,

    /// Path the webhook is mounted at.
    pub path: String,

    /// Shared secret expected in `X-Webhook-Secret`. No check when unset.
    pub secret: Option<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/webhooks/reload".to_string(),
            secret: None,
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Prefix every admin route is nested under.
    pub path_prefix: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            path_prefix: "/admin".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            domains = ["blog.example.com", "*.example.org"]

            [content]
            data_dir = "/srv/blog"
            watch = true

            [webhook]
            secret = "s3cret"

            [observability]
            log_format = "json"

            [headers]
            "cache-control" = "public, max-age=60"
            "#,
        )
        .unwrap();

        assert_eq!(config.content.data_dir, PathBuf::from("/srv/blog"));
        assert_eq!(config.content.watch_debounce_ms, 500);
        assert_eq!(config.webhook.path, "/webhooks/reload");
        assert_eq!(config.webhook.secret.as_deref(), Some("s3cret"));
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(!config.observability.metrics_enabled);
        assert_eq!(config.admin.path_prefix, "/admin");
        assert_eq!(config.headers["cache-control"], "public, max-age=60");
        assert_eq!(config.domains, vec!["blog.example.com", "*.example.org"]);
    }
}
