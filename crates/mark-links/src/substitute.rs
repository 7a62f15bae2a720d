//! Rewriting link targets in markdown.

/// Replace a link target with its resolved URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkSubstitution {
    /// Target text as written between the parentheses.
    pub from: String,
    /// Replacement target.
    pub to: String,
}

/// Apply link substitutions to `markdown` in a single pass.
///
/// Only link targets are rewritten: text matching `from` elsewhere in the
/// document stays as it is. Replacement text is never scanned again, so a
/// substitution whose `to` matches another's `from` does not chain.
pub fn substitute_links(markdown: &str, substitutions: &[LinkSubstitution]) -> String {
    if substitutions.is_empty() {
        return markdown.to_owned();
    }

    let mut result = String::with_capacity(markdown.len());
    let mut rest = markdown;

    while let Some(pos) = rest.find("](") {
        let target_start = pos + 2;
        result.push_str(&rest[..target_start]);
        rest = &rest[target_start..];

        let replacement = substitutions.iter().find(|sub| {
            rest.strip_prefix(sub.from.as_str())
                .is_some_and(|after| after.starts_with(')'))
        });

        if let Some(sub) = replacement {
            result.push_str(&sub.to);
            rest = &rest[sub.from.len()..];
        }
    }

    result.push_str(rest);
    result
}
