//! Relative link resolution for mark documents.
//!
//! Markdown documents link to each other with relative paths
//! (`[setup](./setup.md#install)`). Once published, those paths mean nothing
//! to Confluence, so before rendering every link to a managed document is
//! rewritten to the URL of the page it is published as.
//!
//! The flow is:
//!
//! 1. [`parse_links`] finds link targets in raw markdown.
//! 2. [`LinkResolver`] maps each target to a URL, reading the linked file's
//!    metadata and asking a [`PageLookup`] for the page.
//! 3. [`substitute_links`] rewrites the targets in the markdown.

mod error;
mod parser;
mod resolver;
mod substitute;

use mark_meta::{Meta, MetaError};

pub use error::LinkError;
pub use parser::{ParsedLink, parse_links};
pub use resolver::{LinkResolver, query_escape};
pub use substitute::{LinkSubstitution, substitute_links};

/// Page found by a [`PageLookup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemotePage {
    /// Page URL relative to the lookup's base URL (e.g. `/pages/123`).
    pub relative_link: String,
}

/// Finds published pages by space and title.
pub trait PageLookup {
    /// Lookup failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Base URL that [`RemotePage::relative_link`] is relative to, without a
    /// trailing slash.
    fn base_url(&self) -> &str;

    /// Find a page of `kind` (e.g. `page`) titled `title` in `space`.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup itself fails. A page that does not
    /// exist is `Ok(None)`.
    fn find_page(
        &self,
        space: &str,
        title: &str,
        kind: &str,
    ) -> Result<Option<RemotePage>, Self::Error>;
}

/// Reads metadata from a linked document.
pub trait MetadataSource {
    /// Extract metadata from raw file contents. `Ok(None)` means the file is
    /// not a managed document.
    ///
    /// # Errors
    ///
    /// Returns an error when the header block is malformed.
    fn extract(&self, data: &[u8]) -> Result<Option<Meta>, MetaError>;
}

/// Metadata from `<!-- Key: value -->` header comments.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeaderMetadata;

impl MetadataSource for HeaderMetadata {
    fn extract(&self, data: &[u8]) -> Result<Option<Meta>, MetaError> {
        mark_meta::extract_meta(data).map(|(meta, _)| meta)
    }
}
