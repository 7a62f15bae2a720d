//! Confluence REST API client.
//!
//! Provides sync HTTP client for Confluence Server/Data Center REST API
//! with HTTP basic authentication.

mod pages;

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use mark_config::ConfluenceConfig;
use serde::de::DeserializeOwned;
use ureq::Agent;
use ureq::http::Response;

use crate::error::ConfluenceError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl ConfluenceClient {
    /// Create client with basic authentication.
    ///
    /// # Arguments
    /// * `base_url` - Confluence server base URL, including any context path
    /// * `username` - Account name
    /// * `password` - Password or API token
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth_header: basic_auth(username, password),
        }
    }

    /// Create client from a validated `[confluence]` config section.
    pub fn from_config(config: &ConfluenceConfig) -> Self {
        Self::new(&config.base_url, &config.username, &config.password)
    }

    /// Get the server base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }
}

/// `Authorization` header value for basic authentication.
fn basic_auth(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        BASE64_STANDARD.encode(format!("{username}:{password}"))
    )
}

/// Deserialize a JSON response, turning error statuses into
/// [`ConfluenceError::HttpResponse`].
fn read_json<T: DeserializeOwned>(response: Response<ureq::Body>) -> Result<T, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(ConfluenceError::HttpResponse {
            status,
            body: error_body,
        });
    }

    Ok(body_reader.read_json()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_auth_header() {
        assert_eq!(
            basic_auth("Aladdin", "open sesame"),
            "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ConfluenceClient::new("https://wiki.example.com/confluence/", "u", "p");
        assert_eq!(client.base_url(), "https://wiki.example.com/confluence");
        assert_eq!(
            client.api_url(),
            "https://wiki.example.com/confluence/rest/api"
        );
    }

    #[test]
    fn test_from_config() {
        let config = ConfluenceConfig {
            base_url: "https://wiki.example.com".to_owned(),
            username: "bot".to_owned(),
            password: "token".to_owned(),
        };
        let client = ConfluenceClient::from_config(&config);
        assert_eq!(client.base_url(), "https://wiki.example.com");
        assert_eq!(client.auth_header, basic_auth("bot", "token"));
    }
}
