//! Friendly links shown alongside the blog.

use serde::{Deserialize, Serialize};

use crate::content::error::ValidationError;

const FILE: &str = "links";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Link {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Value of the `rel` attribute, e.g. `friend` or `me`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
}

pub fn load_links(links: Vec<Link>) -> Result<Vec<Link>, ValidationError> {
    for (index, link) in links.iter().enumerate() {
        if link.text.is_empty() {
            return Err(ValidationError::empty(FILE, index, "text"));
        }
        if link.url.is_empty() {
            return Err(ValidationError::empty(FILE, index, "url"));
        }
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_links() {
        let yaml = "- text: text0\n  url: url0\n- text: text1\n  url: url1\n  rel: me\n";
        let links = load_links(serde_yaml::from_str(yaml).unwrap()).unwrap();
        assert_eq!(links[0].text, "text0");
        assert_eq!(links[0].url, "url0");
        assert_eq!(links[1].rel.as_deref(), Some("me"));

        let err = load_links(serde_yaml::from_str("- text: x\n").unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "links[0].url: empty");
    }
}
