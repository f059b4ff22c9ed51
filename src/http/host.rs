//! Host allowlist.
//!
//! When `domains` is configured, requests whose `Host` does not match one of
//! the entries are answered with 404 before reaching any handler. An entry
//! of the form `*.example.com` matches any subdomain of `example.com`, but
//! not `example.com` itself. Ports are ignored.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
};

/// Accepted host names, lowercased.
#[derive(Debug, Clone)]
pub struct HostAllowlist {
    domains: Arc<[String]>,
}

impl HostAllowlist {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Whether `host` (optionally with a `:port`) is accepted.
    pub fn allows(&self, host: &str) -> bool {
        let host = strip_port(host).to_ascii_lowercase();
        self.domains.iter().any(|domain| match domain.strip_prefix("*.") {
            Some(parent) => host
                .strip_suffix(parent)
                .is_some_and(|sub| sub.len() > 1 && sub.ends_with('.')),
            None => host == *domain,
        })
    }
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literals carry colons of their own
    if let Some(end) = host.find(']') {
        return &host[..=end];
    }
    host.rsplit_once(':').map_or(host, |(name, _)| name)
}

/// Reject requests for hosts outside the allowlist.
pub async fn host_filter(
    State(allowlist): State<HostAllowlist>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().host());

    match host {
        Some(host) if allowlist.allows(host) => Ok(next.run(request).await),
        _ => {
            tracing::warn!(host = ?host, path = %request.uri().path(), "Rejected request for unknown host");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_wildcard_hosts() {
        let allow = HostAllowlist::new(["Blog.Example.com", "*.example.org"]);

        assert!(allow.allows("blog.example.com"));
        assert!(allow.allows("BLOG.example.com:8080"));
        assert!(!allow.allows("example.com"));
        assert!(!allow.allows("evil-blog.example.com"));

        assert!(allow.allows("www.example.org"));
        assert!(allow.allows("a.b.example.org:443"));
        assert!(!allow.allows("example.org"));
        assert!(!allow.allows("notexample.org"));
    }

    #[test]
    fn test_ipv6_port_is_stripped() {
        let allow = HostAllowlist::new(["[::1]"]);
        assert!(allow.allows("[::1]:8080"));
        assert!(allow.allows("[::1]"));
    }
}
