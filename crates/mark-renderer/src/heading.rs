//! Leading H1 removal.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static LEADING_H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A#[^#].*\n").expect("invalid leading H1 regex"));

/// Drop a top-level heading on the document's first line.
///
/// Pages already show their title, so a leading `# Title` would duplicate it.
/// Only a heading at byte offset 0 is removed, together with its newline.
///
/// This must run on the whole document: applied to individual lines it
/// would strip every heading.
pub fn strip_leading_h1(markdown: &str) -> Cow<'_, str> {
    LEADING_H1.replace(markdown, "")
}
