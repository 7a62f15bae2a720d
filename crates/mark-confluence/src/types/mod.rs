//! Confluence API types.

mod page;

pub use page::{Ancestor, Links, Page, SearchResults, Version};
