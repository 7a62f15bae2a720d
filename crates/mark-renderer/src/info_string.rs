//! Fenced code block info string parsing.
//!
//! The info string is the text after the opening fence. mark understands
//! `language? [collapse] [title="..."] [theme="..."]`:
//!
//! ~~~text
//! ```python collapse title="Setup script" theme="Midnight"
//! ~~~

use tracing::{debug, trace};

/// Attributes parsed from a code block info string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InfoString {
    /// Language identifier (first word), empty if the first word is an option.
    pub language: String,
    /// Whether the code block should render collapsed.
    pub collapse: bool,
    /// Code macro theme.
    pub theme: String,
    /// Code macro title.
    pub title: String,
}

impl InfoString {
    /// Parse an info string.
    ///
    /// Each attribute is derived independently from the raw header, so a
    /// malformed option never affects the others.
    #[must_use]
    pub fn parse(info: &str) -> Self {
        trace!(info, "parsing code block info string");
        let tokens = split_except_on_quotes(info);

        Self {
            language: parse_language(info).to_owned(),
            collapse: info.contains("collapse"),
            theme: quoted_option(&tokens, "theme", info),
            title: quoted_option(&tokens, "title", info),
        }
    }
}

/// First whitespace-separated word, unless it is one of the options.
fn parse_language(info: &str) -> &str {
    let first = info.split_whitespace().next().unwrap_or("");
    if first == "collapse" || first.starts_with("title=") || first.starts_with("theme=") {
        ""
    } else {
        first
    }
}

/// Value of the first `key=` token with its surrounding quotes removed.
fn quoted_option(tokens: &[String], key: &str, info: &str) -> String {
    for token in tokens {
        let Some(rest) = token.strip_prefix(key) else {
            continue;
        };
        match rest.strip_prefix('=') {
            Some(value) => return strip_quotes(value).trim().to_owned(),
            None => debug!(
                info,
                "found `{key}` in code block info string without `=`, expected {key}=\"...\""
            ),
        }
    }
    String::new()
}

/// Drop the first and last character of a value.
fn strip_quotes(value: &str) -> &str {
    let mut chars = value.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Split on spaces, except inside double-quoted spans.
///
/// Quote characters are kept in the emitted tokens. Consecutive spaces
/// produce empty tokens; a trailing empty token is not emitted.
fn split_except_on_quotes(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in s.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            ' ' if !quoted => tokens.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
