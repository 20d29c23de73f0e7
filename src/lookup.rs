//! Lookup requests and URL construction.

use std::sync::LazyLock;

use url::Url;

use crate::config::DEFAULT_BASE_URL;
use crate::error::{LookupError, Result};
use crate::language::map_language;
use crate::panel::{PanelAction, PanelHost, PanelManager};

static DEFAULT_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"));

/// One documentation lookup: the text to search for and an optional
/// documentation-site language tag that narrows the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub text: String,
    pub language_tag: Option<String>,
}

impl LookupRequest {
    /// Build a request from resolved text and the editor's language identifier.
    pub fn new(text: impl Into<String>, language_id: Option<&str>) -> Self {
        Self {
            text: text.into(),
            language_tag: map_language(language_id).map(str::to_string),
        }
    }

    /// Search query in the form `<tag> <text>`, or just `<text>` without a tag.
    pub fn query(&self) -> String {
        match &self.language_tag {
            Some(tag) => format!("{} {}", tag, self.text),
            None => self.text.clone(),
        }
    }

    /// Lookup URL on `base_url`, with the query carried in the `#q=` fragment.
    ///
    /// Any fragment already present on the base is replaced.
    pub fn url(&self, base_url: &str) -> Result<Url> {
        let url = Url::parse(base_url).map_err(|source| LookupError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(self.with_query(url))
    }

    /// Like [`LookupRequest::url`], but an unparsable base falls back to the
    /// default documentation site.
    pub fn url_or_default(&self, base_url: &str) -> Url {
        match self.url(base_url) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("{}; using {}", e, DEFAULT_BASE_URL);
                self.with_query(DEFAULT_URL.clone())
            }
        }
    }

    fn with_query(&self, mut url: Url) -> Url {
        url.set_fragment(Some(&format!("q={}", self.query())));
        url
    }
}

/// Show the lookup for `request` on `base_url`, reusing the live panel.
///
/// Returns the URL that was displayed and what happened to the panel.
pub async fn dispatch<H>(
    panels: &mut PanelManager,
    host: &H,
    request: &LookupRequest,
    base_url: &str,
) -> (Url, PanelAction)
where
    H: PanelHost + ?Sized,
{
    let url = request.url_or_default(base_url);
    let action = panels.show(host, &url).await;
    (url, action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shellscript_maps_to_bash() {
        let request = LookupRequest::new("grep", Some("shellscript"));
        assert_eq!(request.query(), "bash grep");
        let url = request.url(DEFAULT_BASE_URL).unwrap();
        assert_eq!(url.host_str(), Some("devdocs.io"));
        assert_eq!(url.fragment(), Some("q=bash%20grep"));
        assert_eq!(url.as_str(), "https://devdocs.io/#q=bash%20grep");
    }

    #[test]
    fn unmapped_language_is_kept() {
        let request = LookupRequest::new("map", Some("python"));
        assert_eq!(request.query(), "python map");
        let url = request.url(DEFAULT_BASE_URL).unwrap();
        assert_eq!(url.as_str(), "https://devdocs.io/#q=python%20map");
    }

    #[test]
    fn absent_language_has_no_prefix() {
        let request = LookupRequest::new("foo", None);
        assert_eq!(request.query(), "foo");
        let url = request.url(DEFAULT_BASE_URL).unwrap();
        assert_eq!(url.as_str(), "https://devdocs.io/#q=foo");
    }

    #[test]
    fn url_is_deterministic() {
        let a = LookupRequest::new("Vec::new", Some("rust"));
        let b = LookupRequest::new("Vec::new", Some("rust"));
        assert_eq!(
            a.url("http://localhost:9292").unwrap(),
            b.url("http://localhost:9292").unwrap()
        );
    }

    #[test]
    fn custom_base_keeps_path_and_replaces_fragment() {
        let request = LookupRequest::new("fetch", Some("javascript"));
        let url = request.url("http://localhost:9292/docs#old").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9292/docs#q=javascript%20fetch");
    }

    #[test]
    fn invalid_base_is_an_error() {
        let request = LookupRequest::new("foo", None);
        assert!(matches!(
            request.url("not a url"),
            Err(LookupError::InvalidBaseUrl { .. })
        ));
        assert_eq!(
            request.url_or_default("not a url").as_str(),
            "https://devdocs.io/#q=foo"
        );
    }
}
