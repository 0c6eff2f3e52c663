//! Academy `latest-article` response types.
//!
//! The endpoint wraps its results in `{ "datas": [ ... ] }` with the newest
//! article first. Only the fields the notifier needs are modelled; the rest
//! of each record is ignored.

use serde::Deserialize;

/// Top-level envelope of the `latest-article` endpoint.
#[derive(Debug, Deserialize)]
pub struct LatestArticleResponse {
    #[serde(default)]
    pub datas: Vec<RawArticle>,
}

/// One article record as returned upstream.
#[derive(Debug, Deserialize)]
pub struct RawArticle {
    /// Usually a JSON number, occasionally a string.
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub post_title: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
}
