//! Error types for Confluence integration.

use std::path::PathBuf;

use mark_links::LinkError;
use mark_meta::MetaError;

/// Error from Confluence API operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

/// Error while compiling or publishing a document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PublishError {
    /// Reading the document failed.
    #[error("unable to read {}: {source}", .path.display())]
    Io {
        /// Document path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata header block is malformed.
    #[error("invalid metadata in {}: {source}", .path.display())]
    Meta {
        /// Document path.
        path: PathBuf,
        #[source]
        source: MetaError,
    },

    /// Document has no metadata headers.
    #[error("{} has no metadata headers (expected `<!-- Space: ... -->` and `<!-- Title: ... -->`)", .0.display())]
    NotManaged(PathBuf),

    /// A relative link could not be resolved.
    #[error(transparent)]
    Links(#[from] LinkError),

    /// A `Parent` header names a page that does not exist.
    #[error("parent page {title:?} not found in space {space}")]
    ParentNotFound {
        /// Space key.
        space: String,
        /// Parent page title.
        title: String,
    },

    /// Confluence API error.
    #[error("Confluence error: {0}")]
    Confluence(#[from] ConfluenceError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_io_errors_name_the_path() {
        let err = PublishError::Io {
            path: PathBuf::from("docs/a.md"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "unable to read docs/a.md: gone");
    }

    #[test]
    fn test_confluence_error_wrapped() {
        let err = PublishError::from(ConfluenceError::HttpResponse {
            status: 404,
            body: "no such page".to_owned(),
        });
        assert_eq!(
            err.to_string(),
            "Confluence error: HTTP error: 404 - no such page"
        );
    }
}
