//! Markdown to Confluence storage format renderer.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use tracing::{trace, warn};

use crate::info_string::InfoString;
use crate::macros::{CODE_BLOCK_TEMPLATE, CodeBlockFields, MacroLibrary};
use crate::state::{Capture, HeadingCapture, TableLayout, escape_html};

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered storage format (XHTML) content.
    pub storage: String,
    /// Warnings generated during rendering (e.g., failed macro templates).
    pub warnings: Vec<String>,
}

/// Renders a markdown event stream into Confluence storage format.
///
/// Every event gets the default XHTML rendering except code blocks, whose
/// info string is parsed with [`InfoString`] and rendered through the
/// [`MacroLibrary`] code block template.
pub struct StorageRenderer<'m> {
    output: String,
    /// Info string of the open code block (empty for indented blocks).
    code_info: String,
    code: Capture,
    alt_text: Capture,
    table: TableLayout,
    heading: HeadingCapture,
    pending_image: Option<(String, String)>,
    macros: &'m dyn MacroLibrary,
    warnings: Vec<String>,
}

impl<'m> StorageRenderer<'m> {
    /// Create a renderer that emits code blocks through `macros`.
    #[must_use]
    pub fn new(macros: &'m dyn MacroLibrary) -> Self {
        Self {
            output: String::with_capacity(4096),
            code_info: String::new(),
            code: Capture::default(),
            alt_text: Capture::default(),
            table: TableLayout::default(),
            heading: HeadingCapture::default(),
            pending_image: None,
            macros,
            warnings: Vec::new(),
        }
    }

    /// Parser options for the markdown extensions mark supports.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_SMART_PUNCTUATION
    }

    /// Parse and render markdown text.
    pub fn render_markdown(self, markdown: &str) -> RenderResult {
        self.render(Parser::new_ext(markdown, Self::parser_options()))
    }

    /// Render markdown events and return the result.
    ///
    /// Every event is processed; rendering never stops early.
    pub fn render<'a, I>(mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }

        RenderResult {
            storage: self.output,
            warnings: self.warnings,
        }
    }

    /// Push content to output or heading buffer based on context.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_open() {
            self.heading.push_markup(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br />"),
            Event::Rule => self.output.push_str("<hr />"),
            Event::TaskListMarker(checked) => {
                self.push_inline(if checked { "[x] " } else { "[ ] " });
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Extensions not enabled
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => self.heading.begin(heading_level_to_num(level)),
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                self.code_info.clear();
                if let CodeBlockKind::Fenced(info) = kind {
                    self.code_info.push_str(&info);
                }
                self.code.begin();
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.begin(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.set_header(true);
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.next_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let (tag, style) = (self.table.cell_tag(), self.table.cell_style());
                write!(self.output, "<{tag}{style}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let link_tag = if title.is_empty() {
                    format!(r#"<a href="{}">"#, escape_html(&dest_url))
                } else {
                    format!(
                        r#"<a href="{}" title="{}">"#,
                        escape_html(&dest_url),
                        escape_html(&title)
                    )
                };
                self.push_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected until the image ends
                self.alt_text.begin();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>\n"),
            TagEnd::Heading(_) => {
                if let Some(heading) = self.heading.finish() {
                    writeln!(
                        self.output,
                        r#"<h{level} id="{id}">{}</h{level}>"#,
                        heading.markup.trim(),
                        level = heading.level,
                        id = heading.id,
                    )
                    .unwrap();
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>\n"),
            TagEnd::CodeBlock => self.code_block(),
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
            }
            TagEnd::Item => self.output.push_str("</li>\n"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>\n"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>\n"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.set_header(false);
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                write!(self.output, "</{}>", self.table.cell_tag()).unwrap();
                self.table.next_column();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                let alt = self.alt_text.finish();
                if let Some((src, title)) = self.pending_image.take() {
                    let mut tag = format!(
                        r#"<img src="{}" alt="{}""#,
                        escape_html(&src),
                        escape_html(&alt)
                    );
                    if !title.is_empty() {
                        write!(tag, r#" title="{}""#, escape_html(&title)).unwrap();
                    }
                    tag.push_str(" />");
                    self.push_inline(&tag);
                }
            }
        }
    }

    /// Render the finished code block through the macro library.
    fn code_block(&mut self) {
        let content = self.code.finish();
        let info = std::mem::take(&mut self.code_info);
        let text = content.strip_suffix('\n').unwrap_or(&content);
        let attrs = InfoString::parse(&info);
        trace!(info = %info, language = %attrs.language, "rendering code block");

        let fields = CodeBlockFields {
            language: &attrs.language,
            collapse: attrs.collapse,
            theme: &attrs.theme,
            title: &attrs.title,
            text,
        };

        let mut rendered = String::new();
        match self
            .macros
            .render(CODE_BLOCK_TEMPLATE, &fields, &mut rendered)
        {
            Ok(()) => self.output.push_str(&rendered),
            Err(err) => {
                warn!(error = %err, "code block macro failed, rendering plain block");
                self.warnings.push(err.to_string());
                write!(self.output, "<pre><code>{}</code></pre>", escape_html(text)).unwrap();
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_open() {
            self.code.push(text);
        } else if self.alt_text.is_open() {
            self.alt_text.push(text);
        } else if self.heading.is_open() {
            self.heading.push_plain(text);
            self.heading.push_markup(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.alt_text.is_open() {
            self.alt_text.push(code);
            return;
        }
        if self.heading.is_open() {
            self.heading.push_plain(code);
        }
        self.push_inline(&format!("<code>{}</code>", escape_html(code)));
    }

    fn soft_break(&mut self) {
        if self.code.is_open() {
            self.code.push("\n");
        } else if self.alt_text.is_open() {
            self.alt_text.push(" ");
        } else {
            self.push_inline("\n");
        }
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
