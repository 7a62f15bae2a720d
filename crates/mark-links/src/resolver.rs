//! Resolution of relative links to Confluence URLs.

use std::path::{Component, Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{Span, debug, error, trace, warn};

use crate::error::LinkError;
use crate::parser::{ParsedLink, parse_links};
use crate::substitute::LinkSubstitution;
use crate::{MetadataSource, PageLookup};

/// Characters escaped in a URL query component (everything but unreserved).
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Content type looked up for linked documents.
const PAGE_KIND: &str = "page";

/// Resolves the relative links of one document.
///
/// Links pointing at managed markdown files are turned into Confluence
/// URLs. Anything else (missing files, unmanaged files, external URLs) is
/// left alone.
pub struct LinkResolver<'a, L, M> {
    lookup: &'a L,
    metadata: &'a M,
    span: Span,
}

impl<'a, L: PageLookup, M: MetadataSource> LinkResolver<'a, L, M> {
    /// Create a resolver backed by a page lookup and a metadata source.
    #[must_use]
    pub fn new(lookup: &'a L, metadata: &'a M) -> Self {
        Self {
            lookup,
            metadata,
            span: Span::none(),
        }
    }

    /// Log resolution under the given span (typically one per document).
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Find and resolve every link in `markdown`.
    ///
    /// `base_dir` is the directory of the document; link paths are joined
    /// onto it. Identity substitutions are dropped from the result.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Lookup`] as soon as a page lookup fails. No
    /// partial result is returned in that case.
    pub fn resolve_links(
        &self,
        markdown: &str,
        base_dir: &Path,
    ) -> Result<Vec<LinkSubstitution>, LinkError> {
        let _entered = self.span.enter();

        let mut substitutions = Vec::new();
        for link in parse_links(markdown) {
            trace!(
                full = %link.full,
                path = ?link.path,
                anchor = ?link.anchor,
                "found a relative link"
            );

            let Some(resolved) = self.resolve_link(base_dir, &link)? else {
                continue;
            };
            if resolved == link.full {
                continue;
            }

            substitutions.push(LinkSubstitution {
                from: link.full,
                to: resolved,
            });
        }

        Ok(substitutions)
    }

    /// Resolve a single link. `None` means leave it untouched.
    fn resolve_link(&self, base_dir: &Path, link: &ParsedLink) -> Result<Option<String>, LinkError> {
        let anchor = link.anchor.as_deref().filter(|a| !a.is_empty());

        let mut result = match link.path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => match self.resolve_path(base_dir, path, link)? {
                Some(url) => url,
                None => return Ok(None),
            },
            None => String::new(),
        };

        if let Some(anchor) = anchor {
            result.push('#');
            result.push_str(anchor);
        }

        if result.is_empty() {
            Ok(None)
        } else {
            Ok(Some(result))
        }
    }

    /// Resolve the path part of a link to a page URL.
    fn resolve_path(
        &self,
        base_dir: &Path,
        path: &str,
        link: &ParsedLink,
    ) -> Result<Option<String>, LinkError> {
        let file = join_base(base_dir, path);
        if !file.exists() {
            return Ok(None);
        }

        let contents = match std::fs::read(&file) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(path = %file.display(), error = %err, "unable to read linked file; ignoring the link");
                return Ok(None);
            }
        };

        let meta = match self.metadata.extract(&contents) {
            Ok(Some(meta)) => meta,
            Ok(None) => {
                debug!(path = %file.display(), "linked file has no metadata; ignoring the link");
                return Ok(None);
            }
            Err(err) => {
                error!(
                    path = %file.display(),
                    error = %err,
                    "unable to extract metadata; ignoring the relative link"
                );
                return Ok(None);
            }
        };

        let url = self
            .page_url(&meta.space, &meta.title)
            .map_err(|source| LinkError::Lookup {
                link: link.full.clone(),
                path: file.clone(),
                source: Box::new(source),
            })?;
        Ok(Some(url))
    }

    /// URL of the page with this space and title.
    ///
    /// Uses the page's own link when it exists. Otherwise builds the
    /// `/display/{space}/{title}` URL the page will have once published.
    fn page_url(&self, space: &str, title: &str) -> Result<String, L::Error> {
        let base_url = self.lookup.base_url();
        match self.lookup.find_page(space, title, PAGE_KIND)? {
            Some(page) => Ok(format!("{base_url}{}", page.relative_link)),
            None => {
                debug!(space, title, "page not found, linking to its display URL");
                Ok(format!(
                    "{base_url}/display/{space}/{}",
                    query_escape(title)
                ))
            }
        }
    }
}

/// Join a link path onto the base directory.
///
/// A leading `/` (or drive prefix) does not escape the base: `/a.md` is
/// `base_dir/a.md`.
fn join_base(base_dir: &Path, link_path: &str) -> PathBuf {
    let mut file = base_dir.to_path_buf();
    for component in Path::new(link_path).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {}
            other => file.push(other),
        }
    }
    file
}

/// Escape text for a URL query component (`+` for spaces).
pub fn query_escape(text: &str) -> String {
    utf8_percent_encode(text, QUERY_ESCAPE)
        .to_string()
        .replace("%20", "+")
}
