//! Atom 1.0 rendering.

use atom_syndication::{Entry, Feed, Link, Person, Text};

use crate::content::site::{Author, FeedConfig};
use crate::snapshot::builder::{BuildError, RenderContext};
use crate::snapshot::FeedKind;

pub fn render(ctx: &RenderContext<'_>, config: &FeedConfig) -> Result<Vec<u8>, BuildError> {
    if config.size == 0 {
        return Err(BuildError::invalid(FeedKind::Atom, "size must be greater than 0"));
    }

    let authors = people(ctx.site.author.as_ref());

    let entries = ctx
        .posts
        .iter()
        .take(config.size)
        .map(|post| {
            let link = ctx.url(&post.permalink);
            Entry {
                id: link.clone(),
                title: Text::plain(post.title.clone()),
                updated: post.modified.fixed_offset(),
                published: Some(post.created.fixed_offset()),
                authors: authors.clone(),
                links: vec![Link {
                    href: link,
                    rel: "alternate".to_string(),
                    mime_type: Some("text/html".to_string()),
                    ..Link::default()
                }],
                summary: post.summary.clone().map(Text::plain),
                ..Entry::default()
            }
        })
        .collect();

    let subtitle = (!ctx.site.subtitle.is_empty()).then(|| Text::plain(ctx.site.subtitle.clone()));

    let feed = Feed {
        title: Text::plain(config.title.clone().unwrap_or_else(|| ctx.site.title.clone())),
        id: ctx.base.to_string(),
        updated: ctx.updated.fixed_offset(),
        authors,
        subtitle,
        lang: Some(ctx.site.language.clone()),
        links: vec![
            Link {
                href: ctx.base.to_string(),
                rel: "alternate".to_string(),
                mime_type: Some("text/html".to_string()),
                ..Link::default()
            },
            Link {
                href: ctx.url(&config.url),
                rel: "self".to_string(),
                mime_type: Some("application/atom+xml".to_string()),
                ..Link::default()
            },
        ],
        entries,
        ..Feed::default()
    };

    feed.write_to(Vec::new()).map_err(|e| BuildError::Render {
        feed: FeedKind::Atom,
        message: e.to_string(),
    })
}

fn people(author: Option<&Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name.clone(),
            email: author.email.clone(),
            uri: author.url.clone(),
            ..Person::default()
        }],
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::site::SiteConfig;
    use crate::content::Post;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use url::Url;

    #[test]
    fn test_render_uses_content_timestamps() {
        let mut site = SiteConfig::new("Blog", "https://example.com/");
        site.author = Some(Author {
            name: "Ada".into(),
            email: None,
            url: None,
        });
        let base = Url::parse(&site.base_url).unwrap();
        let at = Utc.with_ymd_and_hms(2023, 11, 5, 10, 0, 0).unwrap();
        let mut post = Post::new("p", "Post", at);
        post.permalink = "/posts/p.html".into();
        let posts = vec![Arc::new(post)];

        let ctx = RenderContext {
            site: &site,
            base: &base,
            posts: &posts,
            tags: &[],
            series: &[],
            updated: at,
        };

        let xml = String::from_utf8(render(&ctx, &FeedConfig::at("/atom.xml")).unwrap()).unwrap();
        assert!(xml.contains("2023-11-05T10:00:00+00:00"));
        assert!(xml.contains("https://example.com/posts/p.html"));
        assert!(xml.contains("<name>Ada</name>"));
        assert!(xml.contains("rel=\"self\""));
    }
}
