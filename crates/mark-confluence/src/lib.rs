//! Confluence integration for mark.
//!
//! This crate provides:
//! - [`ConfluenceClient`]: REST API client with basic authentication, which
//!   also serves as the [`PageLookup`](mark_links::PageLookup) for link
//!   resolution
//! - [`Publisher`]: compile a managed document and create or update its page
//!
//! # Publishing
//!
//! ```ignore
//! use std::path::Path;
//! use mark_confluence::{ConfluenceClient, Publisher};
//!
//! let client = ConfluenceClient::new("https://wiki.example.com", "bot", "token");
//! let result = Publisher::new(&client)
//!     .with_drop_h1(true)
//!     .publish(Path::new("docs/release.md"))?;
//! println!("{}", result.url);
//! ```

// API client
mod client;
pub use client::ConfluenceClient;

// Link resolution backend
mod lookup;

// Publishing workflow
mod publisher;
pub use publisher::{CompiledDocument, PageStore, PublishResult, Publisher};

// Types
pub mod types;
pub use types::Page;

// Errors
pub mod error;
pub use error::{ConfluenceError, PublishError};
