//! Page operations for Confluence API.

use serde_json::{Value, json};
use tracing::{debug, info};

use super::{ConfluenceClient, read_json};
use crate::error::ConfluenceError;
use crate::types::{Page, SearchResults};

impl ConfluenceClient {
    /// Find content of `kind` by space key and exact title.
    ///
    /// Returns the first match, or `None` when nothing has that title.
    pub fn find_page(
        &self,
        space: &str,
        title: &str,
        kind: &str,
    ) -> Result<Option<Page>, ConfluenceError> {
        let url = format!("{}/content", self.api_url());

        debug!(space, title, kind, "Looking up page");

        let response = self
            .agent
            .get(&url)
            .query("spaceKey", space)
            .query("title", title)
            .query("type", kind)
            .query("expand", "ancestors,version")
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        let results: SearchResults = read_json(response)?;
        Ok(results.results.into_iter().next())
    }

    /// Create a page in `space`, under `parent_id` when given.
    pub fn create_page(
        &self,
        space: &str,
        parent_id: Option<&str>,
        title: &str,
        body: &str,
    ) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content", self.api_url());
        let payload = create_payload(space, parent_id, title, body);

        info!(space, title, parent_id = ?parent_id, "Creating page");

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let page: Page = read_json(response)?;
        info!("Created page {} ({})", page.id, page.title);
        Ok(page)
    }

    /// Replace the body of an existing page (auto-increments version).
    ///
    /// Title and ancestors are kept as they are on `page`.
    pub fn update_page(&self, page: &Page, body: &str) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content/{}", self.api_url(), page.id);
        let payload = update_payload(page, body);

        info!(
            "Updating page {} from version {} to {}",
            page.id,
            page.version.number,
            page.version.number + 1
        );

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .put(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let updated: Page = read_json(response)?;
        info!(
            "Updated page {} to version {}",
            updated.id, updated.version.number
        );
        Ok(updated)
    }

    /// Get web URL for page.
    pub fn page_url(&self, page: &Page) -> String {
        if let Some(links) = &page.links
            && let Some(webui) = &links.webui
        {
            return format!("{}{}", self.base_url, webui);
        }

        format!(
            "{}/pages/viewpage.action?pageId={}",
            self.base_url, page.id
        )
    }
}

fn storage_body(body: &str) -> Value {
    json!({
        "storage": {
            "value": body,
            "representation": "storage"
        }
    })
}

fn create_payload(space: &str, parent_id: Option<&str>, title: &str, body: &str) -> Value {
    let mut payload = json!({
        "type": "page",
        "title": title,
        "space": {"key": space},
        "body": storage_body(body),
    });

    if let Some(id) = parent_id {
        payload["ancestors"] = json!([{"id": id}]);
    }

    payload
}

fn update_payload(page: &Page, body: &str) -> Value {
    let mut payload = json!({
        "id": page.id,
        "type": page.content_type,
        "title": page.title,
        "body": storage_body(body),
        "version": {"number": page.version.number + 1},
    });

    // Confluence moves the page to the space root unless the direct parent
    // is sent along.
    if let Some(parent) = page.ancestors.last() {
        payload["ancestors"] = json!([{"id": parent.id}]);
    }

    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ancestor, Links, Version};
    use pretty_assertions::assert_eq;

    fn page() -> Page {
        Page {
            id: "123".to_owned(),
            content_type: "page".to_owned(),
            title: "Release Process".to_owned(),
            version: Version { number: 4 },
            ancestors: vec![
                Ancestor {
                    id: "1".to_owned(),
                    title: Some("Home".to_owned()),
                },
                Ancestor {
                    id: "7".to_owned(),
                    title: Some("Engineering".to_owned()),
                },
            ],
            links: None,
        }
    }

    #[test]
    fn test_create_payload_with_parent() {
        let payload = create_payload("DOCS", Some("7"), "Title", "<p>x</p>");
        assert_eq!(
            payload,
            json!({
                "type": "page",
                "title": "Title",
                "space": {"key": "DOCS"},
                "body": {"storage": {"value": "<p>x</p>", "representation": "storage"}},
                "ancestors": [{"id": "7"}],
            })
        );
    }

    #[test]
    fn test_create_payload_at_space_root() {
        let payload = create_payload("DOCS", None, "Title", "");
        assert!(payload.get("ancestors").is_none());
    }

    #[test]
    fn test_update_payload_bumps_version_and_keeps_parent() {
        let payload = update_payload(&page(), "<p>new</p>");
        assert_eq!(payload["version"]["number"], 5);
        assert_eq!(payload["ancestors"], json!([{"id": "7"}]));
        assert_eq!(payload["title"], "Release Process");
        assert_eq!(payload["body"]["storage"]["value"], "<p>new</p>");
    }

    #[test]
    fn test_page_url_uses_webui_link() {
        let client = ConfluenceClient::new("https://wiki.example.com/", "u", "p");
        let mut page = page();
        page.links = Some(Links {
            webui: Some("/display/DOCS/Release+Process".to_owned()),
        });
        assert_eq!(
            client.page_url(&page),
            "https://wiki.example.com/display/DOCS/Release+Process"
        );
    }

    #[test]
    fn test_page_url_falls_back_to_page_id() {
        let client = ConfluenceClient::new("https://wiki.example.com", "u", "p");
        assert_eq!(
            client.page_url(&page()),
            "https://wiki.example.com/pages/viewpage.action?pageId=123"
        );
    }
}
