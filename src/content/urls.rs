//! Site-relative URL helpers.
//!
//! Every permalink the engine hands out is built here so that the taxonomy,
//! the feeds and the sitemap always agree.

use url::Url;

const SUFFIX: &str = ".html";

/// URL of a tag listing. Page 1 has no query string.
///
/// ```text
/// /tags/rust.html
/// /tags/rust.html?page=2
/// ```
pub fn tag_url(slug: &str, page: usize) -> String {
    let mut url = format!("/tags/{slug}{SUFFIX}");
    if page > 1 {
        url.push_str(&format!("?page={page}"));
    }
    url
}

/// URL of a single post.
pub fn post_url(slug: &str) -> String {
    format!("/posts/{slug}{SUFFIX}")
}

/// URL of the tag index page.
pub fn tags_url() -> String {
    format!("/tags{SUFFIX}")
}

/// Join a site-relative path onto the configured base URL.
///
/// Falls back to plain concatenation when the path cannot be joined, which
/// only happens for inputs that already failed config validation.
pub fn absolute(base: &Url, path: &str) -> String {
    match base.join(path.trim_start_matches('/')) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", base.as_str().trim_end_matches('/'), path),
    }
}
