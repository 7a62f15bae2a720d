//! Metadata headers for managed documents.
//!
//! A document is managed when it starts with HTML comment headers naming its
//! Confluence space and page title:
//!
//! ```text
//! <!-- Space: DOCS -->
//! <!-- Parent: Engineering -->
//! <!-- Title: Release Process -->
//! ```
//!
//! [`extract_meta`] splits those headers off the document and returns the
//! parsed [`Meta`] together with the remaining markdown.

use std::str::Utf8Error;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{trace, warn};

static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*<!--\s*([^:]+?)\s*:\s*(.*?)\s*-->\s*$").expect("invalid header regex")
});

/// Page metadata declared in a document's header block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Meta {
    /// Confluence space key.
    pub space: String,
    /// Page title.
    pub title: String,
    /// Ancestor page titles, outermost first.
    pub parents: Vec<String>,
    /// Page labels.
    pub labels: Vec<String>,
    /// Attachment paths relative to the document.
    pub attachments: Vec<String>,
    /// Page layout (e.g. `article`, `plain`).
    pub layout: Option<String>,
}

/// Error while parsing the metadata header block.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MetaError {
    /// Header block is not valid UTF-8.
    #[error("metadata header is not valid UTF-8")]
    Utf8(#[from] Utf8Error),

    /// Headers present but no `Space` header.
    #[error("space key is not set (missing `<!-- Space: ... -->` header)")]
    MissingSpace,

    /// Headers present but no `Title` header.
    #[error("page title is not set (missing `<!-- Title: ... -->` header)")]
    MissingTitle,
}

/// Known header keys, matched case-insensitively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HeaderKey {
    Space,
    Title,
    Parent,
    Label,
    Attachment,
    Layout,
}

impl HeaderKey {
    fn parse(key: &str) -> Option<Self> {
        Some(match key.to_ascii_lowercase().as_str() {
            "space" => Self::Space,
            "title" => Self::Title,
            "parent" => Self::Parent,
            "label" => Self::Label,
            "attachment" => Self::Attachment,
            "layout" => Self::Layout,
            _ => return None,
        })
    }
}

/// Whether a line starts like a header comment.
fn looks_like_header(line: &[u8]) -> bool {
    line.trim_ascii_start().starts_with(b"<!--")
}

/// Split metadata headers off a document.
///
/// Leading blank lines are skipped and parsing stops at the first line that
/// is not a header comment. Returns `None` (and the whole input) when the
/// document has no headers, which marks it as unmanaged.
///
/// Unknown header keys are logged and ignored.
///
/// # Errors
///
/// Returns [`MetaError`] when headers are present but incomplete or a
/// header line is not UTF-8. A non-UTF-8 line that is not a header comment
/// ends the header block like any other non-header line.
pub fn extract_meta(data: &[u8]) -> Result<(Option<Meta>, &[u8]), MetaError> {
    let mut meta = Meta::default();
    let mut seen_header = false;
    let mut consumed = 0;

    for line in data.split_inclusive(|&b| b == b'\n') {
        let text = match std::str::from_utf8(line) {
            Ok(text) => text,
            Err(err) if looks_like_header(&line[..err.valid_up_to()]) => return Err(err.into()),
            // Binary data or a non-UTF-8 body ends the header block.
            Err(_) => break,
        };
        if text.trim().is_empty() {
            consumed += line.len();
            continue;
        }

        let Some(caps) = HEADER_PATTERN.captures(text) else {
            break;
        };
        consumed += line.len();

        let (key, value) = (&caps[1], caps[2].to_owned());
        trace!(key, value = %value, "metadata header");
        let Some(header) = HeaderKey::parse(key) else {
            warn!(key, "ignoring unknown metadata header");
            continue;
        };
        seen_header = true;

        match header {
            HeaderKey::Space => meta.space = value,
            HeaderKey::Title => meta.title = value,
            HeaderKey::Parent => meta.parents.push(value),
            HeaderKey::Label => meta.labels.push(value),
            HeaderKey::Attachment => meta.attachments.push(value),
            HeaderKey::Layout => meta.layout = Some(value),
        }
    }

    if !seen_header {
        return Ok((None, data));
    }
    if meta.space.is_empty() {
        return Err(MetaError::MissingSpace);
    }
    if meta.title.is_empty() {
        return Err(MetaError::MissingTitle);
    }

    Ok((Some(meta), &data[consumed..]))
}
