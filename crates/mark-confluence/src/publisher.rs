//! Publishing markdown documents as Confluence pages.
//!
//! [`Publisher::publish`] takes a managed document through the whole
//! workflow: metadata, link resolution, rendering, and creating or updating
//! the page. [`Publisher::compile`] stops after rendering.

use std::io;
use std::path::Path;

use mark_links::{HeaderMetadata, LinkResolver, PageLookup, substitute_links};
use mark_meta::{Meta, extract_meta};
use mark_renderer::{MacroLibrary, StorageMacros, compile_markdown, strip_leading_h1};
use tracing::{debug, info, info_span, warn};

use crate::client::ConfluenceClient;
use crate::error::{ConfluenceError, PublishError};
use crate::types::Page;

/// Content type of published documents.
const PAGE_KIND: &str = "page";

/// Page storage used by [`Publisher`].
///
/// Implemented by [`ConfluenceClient`]; tests use an in-memory store.
pub trait PageStore: PageLookup {
    /// Find a page by space key and title.
    fn get_page(&self, space: &str, title: &str) -> Result<Option<Page>, ConfluenceError>;

    /// Create a page, under `parent_id` when given.
    fn create_page(
        &self,
        space: &str,
        parent_id: Option<&str>,
        title: &str,
        body: &str,
    ) -> Result<Page, ConfluenceError>;

    /// Replace the body of an existing page.
    fn update_page(&self, page: &Page, body: &str) -> Result<Page, ConfluenceError>;

    /// Web URL of a page.
    fn page_url(&self, page: &Page) -> String;
}

impl PageStore for ConfluenceClient {
    fn get_page(&self, space: &str, title: &str) -> Result<Option<Page>, ConfluenceError> {
        ConfluenceClient::find_page(self, space, title, PAGE_KIND)
    }

    fn create_page(
        &self,
        space: &str,
        parent_id: Option<&str>,
        title: &str,
        body: &str,
    ) -> Result<Page, ConfluenceError> {
        ConfluenceClient::create_page(self, space, parent_id, title, body)
    }

    fn update_page(&self, page: &Page, body: &str) -> Result<Page, ConfluenceError> {
        ConfluenceClient::update_page(self, page, body)
    }

    fn page_url(&self, page: &Page) -> String {
        ConfluenceClient::page_url(self, page)
    }
}

/// A document compiled to storage format.
#[derive(Debug)]
pub struct CompiledDocument {
    /// Metadata from the document's header block.
    pub meta: Meta,
    /// Confluence storage format.
    pub storage: String,
    /// Non-fatal rendering problems.
    pub warnings: Vec<String>,
}

/// Outcome of publishing one document.
#[derive(Debug)]
pub struct PublishResult {
    /// The page as returned by Confluence after the write.
    pub page: Page,
    /// Web URL of the page.
    pub url: String,
    /// Whether the page was created rather than updated.
    pub created: bool,
}

/// Compiles and publishes managed documents.
pub struct Publisher<'a, S> {
    store: &'a S,
    macros: &'a dyn MacroLibrary,
    drop_h1: bool,
}

impl<'a, S: PageStore> Publisher<'a, S> {
    /// Create a publisher using the stock storage macros.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            macros: &StorageMacros,
            drop_h1: false,
        }
    }

    /// Strip the document's leading H1 before rendering.
    #[must_use]
    pub fn with_drop_h1(mut self, drop_h1: bool) -> Self {
        self.drop_h1 = drop_h1;
        self
    }

    /// Render code blocks with a custom macro library.
    #[must_use]
    pub fn with_macros(mut self, macros: &'a dyn MacroLibrary) -> Self {
        self.macros = macros;
        self
    }

    /// Compile a managed document without touching its page.
    ///
    /// Linked pages are still looked up to resolve relative links.
    pub fn compile(&self, path: &Path) -> Result<CompiledDocument, PublishError> {
        let data = std::fs::read(path).map_err(|source| PublishError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (meta, body) = extract_meta(&data).map_err(|source| PublishError::Meta {
            path: path.to_path_buf(),
            source,
        })?;
        let meta = meta.ok_or_else(|| PublishError::NotManaged(path.to_path_buf()))?;

        let markdown = std::str::from_utf8(body).map_err(|e| PublishError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        let markdown = if self.drop_h1 {
            strip_leading_h1(markdown)
        } else {
            markdown.into()
        };

        let span = info_span!("document", path = %path.display());
        let substitutions = LinkResolver::new(self.store, &HeaderMetadata)
            .with_span(span)
            .resolve_links(&markdown, base_dir(path))?;
        debug!(count = substitutions.len(), "resolved relative links");
        let markdown = substitute_links(&markdown, &substitutions);

        let result = compile_markdown(&markdown, self.macros);
        for warning in &result.warnings {
            warn!(path = %path.display(), "{warning}");
        }

        Ok(CompiledDocument {
            meta,
            storage: result.storage,
            warnings: result.warnings,
        })
    }

    /// Compile a managed document and create or update its page.
    pub fn publish(&self, path: &Path) -> Result<PublishResult, PublishError> {
        let compiled = self.compile(path)?;
        let meta = &compiled.meta;

        let parent = self.resolve_parent(meta)?;

        let (page, created) = match self.store.get_page(&meta.space, &meta.title)? {
            Some(existing) => {
                debug!(id = %existing.id, title = %meta.title, "page exists, updating");
                (self.store.update_page(&existing, &compiled.storage)?, false)
            }
            None => {
                let parent_id = parent.as_ref().map(|p| p.id.as_str());
                let page = self.store.create_page(
                    &meta.space,
                    parent_id,
                    &meta.title,
                    &compiled.storage,
                )?;
                (page, true)
            }
        };

        let url = self.store.page_url(&page);
        info!(path = %path.display(), url = %url, created, "published");

        Ok(PublishResult { page, url, created })
    }

    /// Look up every `Parent` header in order and return the innermost.
    fn resolve_parent(&self, meta: &Meta) -> Result<Option<Page>, PublishError> {
        let mut parent = None;
        for title in &meta.parents {
            let page = self
                .store
                .get_page(&meta.space, title)?
                .ok_or_else(|| PublishError::ParentNotFound {
                    space: meta.space.clone(),
                    title: title.clone(),
                })?;
            parent = Some(page);
        }
        Ok(parent)
    }
}

/// Directory relative links in `path` are resolved against.
fn base_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
