//! Full markdown to storage format pipeline.

use crate::escape::{escape_namespaced_tags, restore_namespaced_tags};
use crate::macros::MacroLibrary;
use crate::renderer::{RenderResult, StorageRenderer};

/// Compile markdown into Confluence storage format.
///
/// Namespaced tags such as `<ac:rich-text-body>` are protected from the
/// markdown parser and come out unchanged.
pub fn compile_markdown(markdown: &str, macros: &dyn MacroLibrary) -> RenderResult {
    let escaped = escape_namespaced_tags(markdown);
    let mut result = StorageRenderer::new(macros).render_markdown(&escaped);
    if let std::borrow::Cow::Owned(restored) = restore_namespaced_tags(&result.storage) {
        result.storage = restored;
    }
    result
}
