//! HTTP client for the academy `latest-article` endpoint.

use std::time::Duration;

use newswatch_core::{Article, ArticleSource, FetchError};
use reqwest::{Client, Url};

use crate::error::AcademyError;
use crate::normalize::normalize_article;
use crate::types::LatestArticleResponse;

/// Client for the academy article feed.
///
/// The full endpoint URL, query string included, is fixed at construction.
/// The request timeout bounds every fetch; a timeout surfaces as
/// [`AcademyError::Http`].
pub struct AcademyClient {
    client: Client,
    url: Url,
}

impl AcademyClient {
    /// Creates a client for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`AcademyError::InvalidUrl`] if `url` does not parse, or
    /// [`AcademyError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, AcademyError> {
        let url = Url::parse(url).map_err(|e| AcademyError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, url })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetches the newest article.
    ///
    /// # Errors
    ///
    /// - [`AcademyError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`AcademyError::Deserialize`] if the body is not the expected JSON.
    /// - [`AcademyError::Empty`] if the response holds no articles.
    /// - [`AcademyError::InvalidId`] if the newest article has no usable id.
    pub async fn latest_article(&self) -> Result<Article, AcademyError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let envelope: LatestArticleResponse =
            serde_json::from_str(&body).map_err(|e| AcademyError::Deserialize {
                context: self.url.to_string(),
                source: e,
            })?;

        let raw = envelope
            .datas
            .into_iter()
            .next()
            .ok_or_else(|| AcademyError::Empty {
                url: self.url.to_string(),
            })?;

        let article = normalize_article(raw)?;
        tracing::debug!(article_id = %article.id, title = %article.title, "fetched latest article");
        Ok(article)
    }
}

impl ArticleSource for AcademyClient {
    async fn fetch_latest(&self) -> Result<Article, FetchError> {
        self.latest_article().await.map_err(|e| {
            tracing::warn!(url = %self.url, error = %e, "failed to fetch latest article");
            FetchError::from(e)
        })
    }
}
