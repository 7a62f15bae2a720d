//! Protection for namespaced storage format tags.
//!
//! Confluence tags like `<ac:rich-text-body>` look like autolinks to a
//! `CommonMark` parser (`ac` is a valid URI scheme) and would come out as
//! `<a href="ac:rich-text-body">`. Tags with attributes such as
//! `<ac:structured-macro ac:name="toc">` fare no better: a colon is not
//! allowed in an HTML tag name, so the tag is escaped as text. Before parsing,
//! those colons are replaced with [`COLON_SENTINEL`], which turns the tags into
//! plain inline HTML; after rendering the sentinel is turned back into a colon.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Marker substituted for the colon of namespaced tags during rendering.
///
/// Letters only, so it is a valid part of a tag name and smart punctuation
/// has nothing to rewrite in it.
pub const COLON_SENTINEL: &str = "bfCOLONbf";

static NAMESPACED_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?\S+?):(\S+?)>").expect("invalid namespaced tag regex"));

static NAMESPACED_TAG_WITH_ATTRIBUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[A-Za-z][A-Za-z0-9-]*:[A-Za-z][A-Za-z0-9-]*\s[^<>]*>")
        .expect("invalid namespaced tag regex")
});

/// Replace the colons of namespaced tags.
///
/// `<prefix:suffix>` and `</prefix:suffix>` get their one colon replaced.
/// In an opening tag with attributes, every colon inside the tag is
/// replaced, attribute values included.
pub fn escape_namespaced_tags(markdown: &str) -> Cow<'_, str> {
    let with_attributes =
        NAMESPACED_TAG_WITH_ATTRIBUTES.replace_all(markdown, |caps: &Captures<'_>| {
            caps[0].replace(':', COLON_SENTINEL)
        });
    if !NAMESPACED_TAG.is_match(&with_attributes) {
        return with_attributes;
    }
    let escaped = NAMESPACED_TAG.replace_all(&with_attributes, |caps: &Captures<'_>| {
        format!("<{}{COLON_SENTINEL}{}>", &caps[1], &caps[2])
    });
    Cow::Owned(escaped.into_owned())
}

/// Turn every sentinel back into a colon.
pub fn restore_namespaced_tags(storage: &str) -> Cow<'_, str> {
    if storage.contains(COLON_SENTINEL) {
        Cow::Owned(storage.replace(COLON_SENTINEL, ":"))
    } else {
        Cow::Borrowed(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_open_and_close_tags() {
        let escaped = escape_namespaced_tags("<ac:rich-text-body>x</ac:rich-text-body>");
        assert_eq!(
            escaped,
            "<acbfCOLONbfrich-text-body>x</acbfCOLONbfrich-text-body>"
        );
    }

    #[test]
    fn test_escape_tags_with_attributes() {
        let escaped = escape_namespaced_tags(r#"<ac:structured-macro ac:name="toc">"#);
        assert_eq!(
            escaped,
            r#"<acbfCOLONbfstructured-macro acbfCOLONbfname="toc">"#
        );

        let escaped = escape_namespaced_tags(r#"<ri:attachment ri:filename="a.png"/>"#);
        assert_eq!(escaped, r#"<ribfCOLONbfattachment ribfCOLONbffilename="a.png"/>"#);
    }

    #[test]
    fn test_escape_ignores_plain_html() {
        let input = r#"<div class="x"><b>bold</b></div>"#;
        assert!(matches!(escape_namespaced_tags(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_restore_round_trip() {
        let input = r#"<ri:page/> and <ac:emoticon> <ri:url ri:value="https://example.com"/>"#;
        let escaped = escape_namespaced_tags(input);
        assert!(!escaped.contains("ri:"));
        assert_eq!(restore_namespaced_tags(&escaped), input);
    }

    #[test]
    fn test_restore_is_unconditional() {
        assert_eq!(
            restore_namespaced_tags("text bfCOLONbf text"),
            "text : text"
        );
    }
}
