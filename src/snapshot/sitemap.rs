//! Sitemap rendering (sitemaps.org 0.9).

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::content::site::SitemapConfig;
use crate::content::urls;
use crate::snapshot::builder::{BuildError, RenderContext};
use crate::snapshot::xml::{escape, DECLARATION};
use crate::snapshot::FeedKind;

const CHANGEFREQ: [&str; 7] = ["always", "hourly", "daily", "weekly", "monthly", "yearly", "never"];

pub fn render(ctx: &RenderContext<'_>, config: &SitemapConfig) -> Result<Vec<u8>, BuildError> {
    check(config)?;

    let mut out = String::with_capacity(256 + ctx.posts.len() * 160);
    out.push_str(DECLARATION);
    out.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    url(&mut out, &ctx.url("/"), ctx.updated, &config.changefreq, config.priority);

    for post in ctx.posts {
        url(
            &mut out,
            &ctx.url(&post.permalink),
            post.modified,
            &config.post_changefreq,
            config.post_priority,
        );
    }

    if config.enable_tag {
        url(&mut out, &ctx.url(&urls::tags_url()), ctx.updated, &config.changefreq, config.priority);
        for tag in ctx.tags.iter().chain(ctx.series.iter()) {
            url(
                &mut out,
                &ctx.url(&tag.permalink),
                tag.modified,
                &config.changefreq,
                config.priority,
            );
        }
    }

    out.push_str("</urlset>\n");
    Ok(out.into_bytes())
}

fn check(config: &SitemapConfig) -> Result<(), BuildError> {
    for (name, value) in [("priority", config.priority), ("post_priority", config.post_priority)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(BuildError::invalid(
                FeedKind::Sitemap,
                format!("{name} {value} is outside 0.0..=1.0"),
            ));
        }
    }
    for (name, value) in [
        ("changefreq", &config.changefreq),
        ("post_changefreq", &config.post_changefreq),
    ] {
        if !CHANGEFREQ.contains(&value.as_str()) {
            return Err(BuildError::invalid(
                FeedKind::Sitemap,
                format!("{name} {value:?} is not a sitemap change frequency"),
            ));
        }
    }
    Ok(())
}

fn url(out: &mut String, loc: &str, lastmod: DateTime<Utc>, changefreq: &str, priority: f64) {
    out.push_str("  <url>\n");
    let _ = writeln!(out, "    <loc>{}</loc>", escape(loc));
    let _ = writeln!(
        out,
        "    <lastmod>{}</lastmod>",
        lastmod.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out, "    <changefreq>{changefreq}</changefreq>");
    let _ = writeln!(out, "    <priority>{priority:.1}</priority>");
    out.push_str("  </url>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::site::SiteConfig;
    use crate::content::tag::load_tags;
    use crate::content::Tag;
    use url::Url;

    #[test]
    fn test_render_lists_tags_when_enabled() {
        let site = SiteConfig::new("Blog", "https://example.com/");
        let base = Url::parse(&site.base_url).unwrap();
        let tags = load_tags(vec![Tag::new("rust", "Rust", "r")]).unwrap();
        let ctx = RenderContext {
            site: &site,
            base: &base,
            posts: &[],
            tags: &tags,
            series: &[],
            updated: DateTime::<Utc>::default(),
        };

        let xml = String::from_utf8(render(&ctx, &SitemapConfig::at("/sitemap.xml")).unwrap()).unwrap();
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<loc>https://example.com/tags/rust.html</loc>"));
        assert!(xml.contains("<lastmod>1970-01-01T00:00:00Z</lastmod>"));
        assert!(xml.contains("<priority>0.6</priority>"));

        let config = SitemapConfig {
            enable_tag: false,
            ..SitemapConfig::at("/sitemap.xml")
        };
        let xml = String::from_utf8(render(&ctx, &config).unwrap()).unwrap();
        assert!(!xml.contains("/tags/"));
    }

    #[test]
    fn test_rejects_bad_settings() {
        let config = SitemapConfig {
            priority: 1.5,
            ..SitemapConfig::at("/sitemap.xml")
        };
        assert!(check(&config).is_err());

        let config = SitemapConfig {
            post_changefreq: "sometimes".into(),
            ..SitemapConfig::at("/sitemap.xml")
        };
        assert!(check(&config).is_err());
    }
}
