//! Normalization of raw academy records into [`Article`]s.

use newswatch_core::Article;
use serde_json::Value;

use crate::error::AcademyError;
use crate::types::RawArticle;

/// Renders an upstream id in canonical string form.
///
/// JSON numbers become their decimal text and strings are trimmed, so `101`
/// and `"101"` compare equal downstream.
///
/// # Errors
///
/// Returns [`AcademyError::InvalidId`] for null, empty, or non-scalar ids.
pub fn normalize_article_id(id: &Value) -> Result<String, AcademyError> {
    let canonical = match id {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => return Err(AcademyError::InvalidId(other.to_string())),
    };
    if canonical.is_empty() {
        return Err(AcademyError::InvalidId("empty string".to_string()));
    }
    Ok(canonical)
}

/// Converts a [`RawArticle`] into an [`Article`].
///
/// A missing or blank title or permalink falls back to a placeholder.
///
/// # Errors
///
/// Returns [`AcademyError::InvalidId`] if the id cannot be normalized.
pub fn normalize_article(raw: RawArticle) -> Result<Article, AcademyError> {
    let id = normalize_article_id(&raw.id)?;
    let non_blank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
    Ok(Article::new(
        id,
        non_blank(raw.post_title),
        non_blank(raw.permalink),
    ))
}
