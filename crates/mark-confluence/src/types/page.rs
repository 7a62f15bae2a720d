//! Confluence page types.

use serde::{Deserialize, Serialize};

/// Confluence page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Content type (`page` or `blogpost`).
    #[serde(rename = "type")]
    pub content_type: String,
    /// Page title.
    pub title: String,
    /// Version information.
    pub version: Version,
    /// Ancestor pages, outermost first (only when expanded).
    #[serde(default)]
    pub ancestors: Vec<Ancestor>,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

/// Page version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
}

/// Ancestor page reference.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ancestor {
    /// Page ID.
    pub id: String,
    /// Page title.
    #[serde(default)]
    pub title: Option<String>,
}

/// Hypermedia links.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Links {
    /// Web UI link, relative to the base URL.
    #[serde(default)]
    pub webui: Option<String>,
}

/// Content search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    /// Matching content.
    pub results: Vec<Page>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_search_results() {
        let json = r#"{
            "results": [{
                "id": "123",
                "type": "page",
                "title": "Release Process",
                "version": {"number": 7, "by": {"displayName": "A"}},
                "ancestors": [{"id": "1", "title": "Home"}, {"id": "42"}],
                "_links": {"webui": "/display/DOCS/Release+Process", "self": "x"}
            }],
            "size": 1
        }"#;

        let results: SearchResults = serde_json::from_str(json).unwrap();
        let page = &results.results[0];
        assert_eq!(page.id, "123");
        assert_eq!(page.content_type, "page");
        assert_eq!(page.version.number, 7);
        assert_eq!(page.ancestors.len(), 2);
        assert_eq!(page.ancestors[1].title, None);
        assert_eq!(
            page.links.as_ref().and_then(|l| l.webui.as_deref()),
            Some("/display/DOCS/Release+Process")
        );
    }

    #[test]
    fn test_deserialize_minimal_page() {
        let json = r#"{"id": "9", "type": "page", "title": "T", "version": {"number": 1}}"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert!(page.ancestors.is_empty());
        assert!(page.links.is_none());
    }
}
