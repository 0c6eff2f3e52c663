//! Keyword filter evaluation.

use std::collections::BTreeSet;

/// Returns `true` when an article with `title` should be sent.
///
/// An empty keyword set disables filtering. Otherwise at least one keyword
/// must occur in the title, ignoring case. Keywords are expected to be
/// lowercase already (see [`normalize_keyword`]).
#[must_use]
pub fn matches(title: &str, keywords: &BTreeSet<String>) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let title = title.to_lowercase();
    keywords.iter().any(|k| title.contains(k.as_str()))
}

/// Trims and lowercases an operator-supplied keyword.
#[must_use]
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim().to_lowercase()
}
