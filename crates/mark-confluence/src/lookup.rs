//! Page lookup for link resolution.

use mark_links::{PageLookup, RemotePage};

use crate::client::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::types::Page;

impl PageLookup for ConfluenceClient {
    type Error = ConfluenceError;

    fn base_url(&self) -> &str {
        ConfluenceClient::base_url(self)
    }

    fn find_page(
        &self,
        space: &str,
        title: &str,
        kind: &str,
    ) -> Result<Option<RemotePage>, ConfluenceError> {
        let page = ConfluenceClient::find_page(self, space, title, kind)?;
        Ok(page.as_ref().map(remote_page))
    }
}

/// Link to `page` relative to the base URL.
pub(crate) fn remote_page(page: &Page) -> RemotePage {
    let relative_link = page
        .links
        .as_ref()
        .and_then(|links| links.webui.clone())
        .unwrap_or_else(|| format!("/pages/viewpage.action?pageId={}", page.id));
    RemotePage { relative_link }
}
