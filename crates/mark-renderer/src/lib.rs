//! Markdown to Confluence storage format.
//!
//! The pipeline for a single document:
//!
//! 1. [`strip_leading_h1`] optionally drops a leading `# Title` line.
//! 2. [`escape_namespaced_tags`] protects `<ac:...>` style tags.
//! 3. [`StorageRenderer`] walks the `pulldown-cmark` event stream. Code
//!    blocks have their info string parsed by [`InfoString`] and are rendered
//!    through a [`MacroLibrary`].
//! 4. [`restore_namespaced_tags`] puts the colons back.
//!
//! [`compile_markdown`] runs steps 2–4.
//!
//! # Example
//!
//! ```
//! use mark_renderer::{StorageMacros, compile_markdown};
//!
//! let result = compile_markdown("```sh collapse\nls\n```", &StorageMacros);
//! assert!(result.storage.contains(r#"ac:name="collapse">true"#));
//! ```

mod compile;
mod escape;
mod heading;
mod info_string;
mod macros;
mod renderer;
mod state;

pub use compile::compile_markdown;
pub use escape::{COLON_SENTINEL, escape_namespaced_tags, restore_namespaced_tags};
pub use heading::strip_leading_h1;
pub use info_string::InfoString;
pub use macros::{CODE_BLOCK_TEMPLATE, CodeBlockFields, MacroError, MacroLibrary, StorageMacros};
pub use renderer::{RenderResult, StorageRenderer};
pub use state::{escape_html, heading_anchor};
