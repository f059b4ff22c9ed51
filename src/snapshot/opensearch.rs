//! OpenSearch description document.

use std::fmt::Write;

use crate::content::site::OpensearchConfig;
use crate::snapshot::builder::{BuildError, RenderContext};
use crate::snapshot::xml::{element, escape, DECLARATION};
use crate::snapshot::FeedKind;

/// OpenSearch 1.1 limits `ShortName` to 16 characters.
const SHORT_NAME_MAX: usize = 16;

pub fn render(ctx: &RenderContext<'_>, config: &OpensearchConfig) -> Result<Vec<u8>, BuildError> {
    let short_name = config.short_name.trim();
    if short_name.is_empty() {
        return Err(BuildError::invalid(FeedKind::Opensearch, "short_name is empty"));
    }
    if short_name.chars().count() > SHORT_NAME_MAX {
        return Err(BuildError::invalid(
            FeedKind::Opensearch,
            format!("short_name is longer than {SHORT_NAME_MAX} characters"),
        ));
    }

    let description = if config.description.is_empty() {
        &ctx.site.title
    } else {
        &config.description
    };
    let template = format!("{}?q={{searchTerms}}", ctx.url(&ctx.site.search_url));

    let mut out = String::with_capacity(512);
    out.push_str(DECLARATION);
    out.push_str("<OpenSearchDescription xmlns=\"http://a9.com/-/spec/opensearch/1.1/\">\n");
    element(&mut out, 2, "InputEncoding", "UTF-8");
    element(&mut out, 2, "ShortName", short_name);
    element(&mut out, 2, "Description", description);
    if let Some(long_name) = &config.long_name {
        element(&mut out, 2, "LongName", long_name);
    }
    if let Some(image) = &config.image {
        element(&mut out, 2, "Image", image);
    }
    let _ = writeln!(
        out,
        "  <Url type=\"text/html\" template=\"{}\"/>",
        escape(&template)
    );
    element(&mut out, 2, "Language", &ctx.site.language);
    out.push_str("</OpenSearchDescription>\n");

    Ok(out.into_bytes())
}
