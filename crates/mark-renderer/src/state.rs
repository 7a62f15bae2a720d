//! State tracked while walking the event stream.

use std::collections::HashMap;

use pulldown_cmark::Alignment;

/// Text collected between a start event and its end event.
///
/// Used for code block bodies and image alt text, which are emitted only
/// once complete.
#[derive(Default)]
pub(crate) struct Capture {
    open: bool,
    text: String,
}

impl Capture {
    pub(crate) fn begin(&mut self) {
        self.open = true;
        self.text.clear();
    }

    pub(crate) fn finish(&mut self) -> String {
        self.open = false;
        std::mem::take(&mut self.text)
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

/// Column layout of the table being rendered.
#[derive(Default)]
pub(crate) struct TableLayout {
    alignments: Vec<Alignment>,
    column: usize,
    header: bool,
}

impl TableLayout {
    pub(crate) fn begin(&mut self, alignments: Vec<Alignment>) {
        *self = Self {
            alignments,
            ..Self::default()
        };
    }

    pub(crate) fn set_header(&mut self, header: bool) {
        self.header = header;
        self.column = 0;
    }

    pub(crate) fn next_row(&mut self) {
        self.column = 0;
    }

    pub(crate) fn next_column(&mut self) {
        self.column += 1;
    }

    /// `th` in the header row, `td` elsewhere.
    pub(crate) fn cell_tag(&self) -> &'static str {
        if self.header { "th" } else { "td" }
    }

    /// Style attribute for the current column, empty when unaligned.
    pub(crate) fn cell_style(&self) -> &'static str {
        let Some(alignment) = self.alignments.get(self.column) else {
            return "";
        };
        match alignment {
            Alignment::None => "",
            Alignment::Left => r#" style="text-align:left""#,
            Alignment::Center => r#" style="text-align:center""#,
            Alignment::Right => r#" style="text-align:right""#,
        }
    }
}

/// A finished heading.
pub(crate) struct Heading {
    pub(crate) level: u8,
    pub(crate) id: String,
    pub(crate) markup: String,
}

/// Heading being captured.
///
/// The opening tag carries an id derived from the heading's plain text, so
/// the inline markup is buffered until the heading ends.
#[derive(Default)]
pub(crate) struct HeadingCapture {
    level: Option<u8>,
    plain: String,
    markup: String,
    /// How often each anchor has been handed out in this document.
    used: HashMap<String, usize>,
}

impl HeadingCapture {
    pub(crate) fn begin(&mut self, level: u8) {
        self.level = Some(level);
        self.plain.clear();
        self.markup.clear();
    }

    pub(crate) fn is_open(&self) -> bool {
        self.level.is_some()
    }

    pub(crate) fn push_plain(&mut self, text: &str) {
        self.plain.push_str(text);
    }

    pub(crate) fn push_markup(&mut self, markup: &str) {
        self.markup.push_str(markup);
    }

    pub(crate) fn finish(&mut self) -> Option<Heading> {
        let level = self.level.take()?;
        let anchor = heading_anchor(&self.plain);
        let id = self.unique_id(&anchor);
        Some(Heading {
            level,
            id,
            markup: std::mem::take(&mut self.markup),
        })
    }

    /// Suffix repeated anchors with `-1`, `-2`, ...
    fn unique_id(&mut self, anchor: &str) -> String {
        let seen = self.used.entry(anchor.to_owned()).or_insert(0);
        let id = if *seen == 0 {
            anchor.to_owned()
        } else {
            format!("{anchor}-{seen}")
        };
        *seen += 1;
        id
    }
}

/// Anchor name for a heading.
///
/// Letters and digits are kept (lowercased); every run of anything else
/// becomes a single `-` between words.
#[must_use]
pub fn heading_anchor(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !anchor.is_empty() {
                anchor.push('-');
            }
            pending_dash = false;
            anchor.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    anchor
}

/// Escape `&`, `<`, `>` and `"` for XHTML text and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut start = 0;

    for (i, c) in text.char_indices() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            _ => continue,
        };
        escaped.push_str(&text[start..i]);
        escaped.push_str(entity);
        start = i + c.len_utf8();
    }

    escaped.push_str(&text[start..]);
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_heading_anchor() {
        assert_eq!(heading_anchor("Hello World"), "hello-world");
        assert_eq!(heading_anchor("What's New?"), "what-s-new");
        assert_eq!(heading_anchor("  -- Padded --  "), "padded");
        assert_eq!(heading_anchor("snake_case"), "snake-case");
        assert_eq!(heading_anchor("Über Größe 2"), "über-größe-2");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">"), "&lt;a href=&quot;x&quot;&gt;");
        assert_eq!(escape_html("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(escape_html("it's fine"), "it's fine");
        assert_eq!(escape_html("naïve <ü>"), "naïve &lt;ü&gt;");
    }

    #[test]
    fn test_capture() {
        let mut capture = Capture::default();
        assert!(!capture.is_open());

        capture.begin();
        capture.push("fn main() {}");
        capture.push("\n");
        assert!(capture.is_open());
        assert_eq!(capture.finish(), "fn main() {}\n");
        assert!(!capture.is_open());

        capture.begin();
        assert_eq!(capture.finish(), "");
    }

    #[test]
    fn test_table_layout() {
        let mut table = TableLayout::default();
        table.begin(vec![Alignment::Center, Alignment::None]);

        table.set_header(true);
        assert_eq!(table.cell_tag(), "th");
        assert_eq!(table.cell_style(), r#" style="text-align:center""#);
        table.next_column();
        assert_eq!(table.cell_style(), "");
        table.next_column();
        assert_eq!(table.cell_style(), "");

        table.set_header(false);
        assert_eq!(table.cell_tag(), "td");
        assert_eq!(table.cell_style(), r#" style="text-align:center""#);
    }

    #[test]
    fn test_repeated_headings_get_unique_ids() {
        let mut heading = HeadingCapture::default();
        let ids: Vec<_> = (0..3)
            .map(|_| {
                heading.begin(2);
                heading.push_plain("FAQ");
                let done = heading.finish().unwrap();
                assert_eq!(done.level, 2);
                done.id
            })
            .collect();
        assert_eq!(ids, vec!["faq", "faq-1", "faq-2"]);
        assert!(!heading.is_open());
    }
}
