//! Confluence macro templates.
//!
//! The renderer hands code blocks to a [`MacroLibrary`] instead of emitting
//! markup itself, so callers can swap in their own macro markup.
//! [`StorageMacros`] provides the stock Confluence code macro.

use std::fmt::Write;

use crate::state::escape_html;

/// Name of the template used for fenced code blocks.
pub const CODE_BLOCK_TEMPLATE: &str = "code-block";

/// Fields passed to the code block template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeBlockFields<'a> {
    /// Language identifier, may be empty.
    pub language: &'a str,
    /// Render collapsed.
    pub collapse: bool,
    /// Macro theme, may be empty.
    pub theme: &'a str,
    /// Macro title, may be empty.
    pub title: &'a str,
    /// Code block text without its trailing newline.
    pub text: &'a str,
}

/// Error from rendering a macro template.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MacroError {
    /// The library has no template with this name.
    #[error("unknown macro template: {0}")]
    UnknownTemplate(String),
}

/// A set of named macro templates.
pub trait MacroLibrary {
    /// Render `template` with `fields`, appending to `out`.
    fn render(
        &self,
        template: &str,
        fields: &CodeBlockFields<'_>,
        out: &mut String,
    ) -> Result<(), MacroError>;
}

/// Stock Confluence storage format macros.
///
/// `mermaid` blocks go to the Mermaid macro, everything else to the
/// built-in code macro.
#[derive(Clone, Copy, Debug, Default)]
pub struct StorageMacros;

impl MacroLibrary for StorageMacros {
    fn render(
        &self,
        template: &str,
        fields: &CodeBlockFields<'_>,
        out: &mut String,
    ) -> Result<(), MacroError> {
        if template != CODE_BLOCK_TEMPLATE {
            return Err(MacroError::UnknownTemplate(template.to_owned()));
        }
        code_macro(fields, out);
        Ok(())
    }
}

fn code_macro(fields: &CodeBlockFields<'_>, out: &mut String) {
    if fields.language == "mermaid" {
        out.push_str(r#"<ac:structured-macro ac:name="cloudscript-confluence-mermaid">"#);
        out.push_str(r#"<ac:parameter ac:name="showSource">true</ac:parameter>"#);
    } else {
        out.push_str(r#"<ac:structured-macro ac:name="code">"#);
        push_parameter(out, "language", fields.language);
    }
    push_parameter(
        out,
        "collapse",
        if fields.collapse { "true" } else { "false" },
    );
    push_parameter(out, "theme", fields.theme);
    push_parameter(out, "title", fields.title);
    write!(
        out,
        "<ac:plain-text-body><![CDATA[{}]]></ac:plain-text-body>",
        escape_cdata(fields.text)
    )
    .unwrap();
    out.push_str("</ac:structured-macro>");
}

/// Write a macro parameter, skipping empty values.
fn push_parameter(out: &mut String, name: &str, value: &str) {
    if !value.is_empty() {
        write!(
            out,
            r#"<ac:parameter ac:name="{name}">{}</ac:parameter>"#,
            escape_html(value)
        )
        .unwrap();
    }
}

/// Split `]]>` so it can't terminate the CDATA section early.
fn escape_cdata(text: &str) -> String {
    text.replace("]]>", "]]]]><![CDATA[>")
}
