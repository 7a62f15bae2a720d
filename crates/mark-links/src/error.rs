//! Error types for link resolution.

use std::path::PathBuf;

/// Error while resolving relative links.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LinkError {
    /// Looking up the linked page failed.
    #[error("unable to resolve relative link {link:?} ({}): {source}", .path.display())]
    Lookup {
        /// Link target as written in the document.
        link: String,
        /// File the link points at.
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
