//! RSS 2.0 rendering.

use std::fmt::Write;

use crate::content::site::FeedConfig;
use crate::snapshot::builder::{BuildError, RenderContext};
use crate::snapshot::xml::{element, escape, DECLARATION};
use crate::snapshot::FeedKind;

pub fn render(ctx: &RenderContext<'_>, config: &FeedConfig) -> Result<Vec<u8>, BuildError> {
    if config.size == 0 {
        return Err(BuildError::invalid(FeedKind::Rss, "size must be greater than 0"));
    }

    let title = config.title.as_deref().unwrap_or(&ctx.site.title);
    let description = if ctx.site.subtitle.is_empty() {
        &ctx.site.description
    } else {
        &ctx.site.subtitle
    };

    let mut out = String::with_capacity(1024);
    out.push_str(DECLARATION);
    out.push_str("<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n");
    out.push_str("<channel>\n");
    element(&mut out, 2, "title", title);
    element(&mut out, 2, "link", ctx.base.as_str());
    element(&mut out, 2, "description", description);
    element(&mut out, 2, "language", &ctx.site.language);
    let _ = writeln!(
        out,
        "  <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>",
        escape(&ctx.url(&config.url))
    );
    element(&mut out, 2, "lastBuildDate", &ctx.updated.to_rfc2822());

    for post in ctx.posts.iter().take(config.size) {
        let link = ctx.url(&post.permalink);
        out.push_str("  <item>\n");
        element(&mut out, 4, "title", &post.title);
        element(&mut out, 4, "link", &link);
        let _ = writeln!(out, "    <guid isPermaLink=\"true\">{}</guid>", escape(&link));
        element(&mut out, 4, "pubDate", &post.created.to_rfc2822());
        if let Some(summary) = &post.summary {
            element(&mut out, 4, "description", summary);
        }
        for tag in &post.tags {
            element(&mut out, 4, "category", tag);
        }
        out.push_str("  </item>\n");
    }

    out.push_str("</channel>\n</rss>\n");
    Ok(out.into_bytes())
}
