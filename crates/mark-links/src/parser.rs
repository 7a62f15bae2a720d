//! Markdown link discovery.

use std::sync::LazyLock;

use regex::Regex;

/// `[label](path#anchor)` where both path and anchor are optional.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]+\]\((([^)#]+)?#?([^)]+)?)\)").expect("invalid link regex")
});

/// A link target found in raw markdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedLink {
    /// Everything between the parentheses, as written.
    pub full: String,
    /// Path part before `#`.
    pub path: Option<String>,
    /// Anchor part after `#`.
    pub anchor: Option<String>,
}

/// Find every `[label](target)` link in document order.
///
/// Duplicates are kept, and links with neither path nor anchor (`[x]()`,
/// `[x](#)`) are reported too. Whether the path means anything is left to
/// the resolver.
pub fn parse_links(markdown: &str) -> Vec<ParsedLink> {
    LINK_PATTERN
        .captures_iter(markdown)
        .map(|caps| ParsedLink {
            full: caps[1].to_owned(),
            path: caps.get(2).map(|m| m.as_str().to_owned()),
            anchor: caps.get(3).map(|m| m.as_str().to_owned()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn link(full: &str, path: Option<&str>, anchor: Option<&str>) -> ParsedLink {
        ParsedLink {
            full: full.to_owned(),
            path: path.map(str::to_owned),
            anchor: anchor.map(str::to_owned),
        }
    }

    #[test]
    fn test_path_and_anchor() {
        assert_eq!(
            parse_links("See [setup](./setup.md#install)."),
            vec![link("./setup.md#install", Some("./setup.md"), Some("install"))]
        );
    }

    #[test]
    fn test_path_only() {
        assert_eq!(
            parse_links("[a](../a.md)"),
            vec![link("../a.md", Some("../a.md"), None)]
        );
    }

    #[test]
    fn test_anchor_only() {
        assert_eq!(
            parse_links("[top](#top)"),
            vec![link("#top", None, Some("top"))]
        );
    }

    #[test]
    fn test_empty_targets_still_reported() {
        assert_eq!(
            parse_links("[x]() [y](#)"),
            vec![link("", None, None), link("#", None, None)]
        );
    }

    #[test]
    fn test_duplicates_in_document_order() {
        let links = parse_links("[a](b.md) text [c](d.md) and [a](b.md)");
        let fulls: Vec<_> = links.iter().map(|l| l.full.as_str()).collect();
        assert_eq!(fulls, vec!["b.md", "d.md", "b.md"]);
    }

    #[test]
    fn test_anchor_keeps_later_hashes() {
        assert_eq!(
            parse_links("[x](a.md#b#c)"),
            vec![link("a.md#b#c", Some("a.md"), Some("b#c"))]
        );
    }

    #[test]
    fn test_external_links_are_reported() {
        let links = parse_links("[site](https://example.com/page)");
        assert_eq!(links[0].path.as_deref(), Some("https://example.com/page"));
    }

    #[test]
    fn test_empty_label_not_a_link() {
        assert!(parse_links("[](a.md)").is_empty());
    }

    #[test]
    fn test_image_syntax_matches_too() {
        let links = parse_links("![diagram](img/flow.png)");
        assert_eq!(links[0].full, "img/flow.png");
    }
}
