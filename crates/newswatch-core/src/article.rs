use std::fmt;

/// Placeholder used when the upstream record has no title.
pub const MISSING_TITLE: &str = "Title not found";

/// Placeholder used when the upstream record has no permalink.
pub const MISSING_LINK: &str = "Link not found";

/// The newest article reported by the upstream feed.
///
/// `id` is already in canonical string form; article sources normalise
/// numeric and string identifiers before constructing this type so the
/// engine can compare ids with plain string equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub link: String,
}

impl Article {
    /// Builds an article, substituting placeholders for a missing title or link.
    #[must_use]
    pub fn new(id: impl Into<String>, title: Option<String>, link: Option<String>) -> Self {
        Self {
            id: id.into(),
            title: title.unwrap_or_else(|| MISSING_TITLE.to_string()),
            link: link.unwrap_or_else(|| MISSING_LINK.to_string()),
        }
    }
}

/// A Telegram chat identifier: a numeric id or an `@channel` handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatId(String);

impl ChatId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
