//! Dedup-and-notify engine.
//!
//! [`Engine::poll_once`] runs one poll cycle: fetch the latest article,
//! compare it with the last-seen marker, evaluate the keyword filter, notify
//! the destination chat, and record the article as seen. Scheduling lives
//! outside this crate; the engine has no timers of its own.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;

use crate::article::{Article, ChatId};
use crate::error::{FetchError, PollError, SendError};
use crate::filter::matches;
use crate::notification::{format_notification, DEFAULT_HEADER};
use crate::store::StateStore;

/// Supplies the newest article of the upstream feed.
///
/// Implementations own their request timeout and report it as a
/// [`FetchError::Transport`].
pub trait ArticleSource: Send + Sync {
    fn fetch_latest(&self) -> impl Future<Output = Result<Article, FetchError>> + Send;
}

/// Delivers pre-formatted text to a chat.
pub trait Notifier: Send + Sync {
    fn send(&self, chat: &ChatId, text: &str) -> impl Future<Output = Result<(), SendError>> + Send;
}

impl<T: ArticleSource> ArticleSource for Arc<T> {
    fn fetch_latest(&self) -> impl Future<Output = Result<Article, FetchError>> + Send {
        (**self).fetch_latest()
    }
}

impl<T: Notifier> Notifier for Arc<T> {
    fn send(&self, chat: &ChatId, text: &str) -> impl Future<Output = Result<(), SendError>> + Send {
        (**self).send(chat, text)
    }
}

/// What a poll cycle decided about the fetched article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The article id equals the last-seen marker.
    AlreadySeen,
    /// New article that passes the filter.
    Send,
    /// New article that fails the filter.
    Filtered,
}

/// Whether `article` differs from the last-seen marker. Only equality is
/// checked; ids carry no ordering.
#[must_use]
pub fn is_new(article: &Article, last_seen: Option<&str>) -> bool {
    last_seen != Some(article.id.as_str())
}

/// Decides what to do with `article` given the persisted state.
#[must_use]
pub fn decide(article: &Article, last_seen: Option<&str>, keywords: &BTreeSet<String>) -> Decision {
    if !is_new(article, last_seen) {
        Decision::AlreadySeen
    } else if matches(&article.title, keywords) {
        Decision::Send
    } else {
        Decision::Filtered
    }
}

/// Result of a completed poll cycle.
#[derive(Debug)]
pub enum PollOutcome {
    AlreadySeen { article_id: String },
    Sent { article: Article },
    Filtered { article: Article },
    /// The article passed the filter but delivery failed. It is still
    /// recorded as seen and will not be retried.
    SendFailed { article: Article, error: SendError },
}

impl PollOutcome {
    #[must_use]
    pub fn decision(&self) -> Decision {
        match self {
            PollOutcome::AlreadySeen { .. } => Decision::AlreadySeen,
            PollOutcome::Sent { .. } | PollOutcome::SendFailed { .. } => Decision::Send,
            PollOutcome::Filtered { .. } => Decision::Filtered,
        }
    }
}

/// Destination and presentation settings for notifications.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub destination: ChatId,
    pub timezone: Tz,
    pub header: String,
}

impl EngineConfig {
    #[must_use]
    pub fn new(destination: ChatId) -> Self {
        Self {
            destination,
            timezone: chrono_tz::Asia::Jakarta,
            header: DEFAULT_HEADER.to_string(),
        }
    }
}

pub struct Engine<A, N, S> {
    source: A,
    notifier: N,
    store: S,
    config: EngineConfig,
}

impl<A, N, S> Engine<A, N, S>
where
    A: ArticleSource,
    N: Notifier,
    S: StateStore,
{
    pub fn new(source: A, notifier: N, store: S, config: EngineConfig) -> Self {
        Self {
            source,
            notifier,
            store,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one poll cycle.
    ///
    /// A fetch failure aborts before any state is touched. Once a new
    /// article has been evaluated its id is always written as the last-seen
    /// marker, whether it was sent, filtered out, or failed to send.
    ///
    /// # Errors
    ///
    /// - [`PollError::Fetch`] if the article source fails; no state changed.
    /// - [`PollError::Store`] if reading or writing persisted state fails.
    pub async fn poll_once(&self) -> Result<PollOutcome, PollError> {
        let article = self.source.fetch_latest().await?;
        let last_seen = self.store.read_last_seen_id()?;

        // The filter record is only consulted for articles not seen before.
        let keywords = if is_new(&article, last_seen.as_deref()) {
            self.store.read_filter_keywords()?
        } else {
            BTreeSet::new()
        };

        let article_id = article.id.clone();
        let outcome = match decide(&article, last_seen.as_deref(), &keywords) {
            Decision::AlreadySeen => {
                tracing::debug!(article_id = %article.id, "no new article");
                return Ok(PollOutcome::AlreadySeen {
                    article_id: article.id,
                });
            }
            Decision::Send => self.deliver(article).await,
            Decision::Filtered => {
                tracing::info!(
                    article_id = %article.id,
                    keywords = ?keywords,
                    "new article does not match any filter keyword; not sent"
                );
                PollOutcome::Filtered { article }
            }
        };

        self.store.write_last_seen_id(&article_id)?;

        Ok(outcome)
    }

    async fn deliver(&self, article: Article) -> PollOutcome {
        let now = Utc::now().with_timezone(&self.config.timezone);
        let text = format_notification(&self.config.header, &article, &now);

        match self.notifier.send(&self.config.destination, &text).await {
            Ok(()) => {
                tracing::info!(
                    article_id = %article.id,
                    destination = %self.config.destination,
                    "new article sent"
                );
                PollOutcome::Sent { article }
            }
            Err(error) => {
                tracing::error!(
                    article_id = %article.id,
                    destination = %self.config.destination,
                    error = %error,
                    "failed to send new article; marking it seen anyway"
                );
                PollOutcome::SendFailed { article, error }
            }
        }
    }
}
