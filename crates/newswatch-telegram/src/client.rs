//! HTTP client for the Telegram Bot API.
//!
//! Covers the two calls the notifier needs: `sendMessage` for outbound text
//! and `getUpdates` long polling for operator commands.

use std::time::Duration;

use newswatch_core::{ChatId, Notifier, ParseMode, Reply, SendError};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::TelegramError;
use crate::types::{ApiResponse, Update};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Extra time allowed on top of the long-poll timeout before the HTTP
/// request itself is abandoned.
const LONG_POLL_GRACE_SECS: u64 = 10;

pub struct TelegramClient {
    client: Client,
    token: String,
    base_url: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("token", &"[redacted]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Creates a client pointed at the public Bot API.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, TelegramError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(reqwest::Error::without_url)?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base_url, self.token)
    }

    /// Sends `text` to `chat`.
    ///
    /// If the API rejects a Markdown message because its entities do not
    /// parse, it is sent once more as plain text. Other rejections are
    /// returned as is.
    ///
    /// # Errors
    ///
    /// - [`TelegramError::Api`] if the API rejects the message.
    /// - [`TelegramError::Http`] on network failure or timeout.
    /// - [`TelegramError::Deserialize`] if the response is not a Bot API envelope.
    pub async fn send_message(
        &self,
        chat: &ChatId,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), TelegramError> {
        let mut body = serde_json::json!({
            "chat_id": chat.as_str(),
            "text": text,
        });
        let Some(mode) = parse_mode else {
            return self.call::<serde_json::Value>("sendMessage", &body, None).await.map(drop);
        };

        body["parse_mode"] = serde_json::Value::from(mode.as_str());
        match self.call::<serde_json::Value>("sendMessage", &body, None).await {
            Ok(_) => Ok(()),
            Err(TelegramError::Api { code, description })
                if is_markup_rejection(code, &description) =>
            {
                tracing::warn!(
                    chat = %chat,
                    code,
                    description = %description,
                    "Telegram sendMessage with {} failed; retrying without parse_mode",
                    mode.as_str()
                );
                let plain = serde_json::json!({
                    "chat_id": chat.as_str(),
                    "text": text,
                });
                self.call::<serde_json::Value>("sendMessage", &plain, None)
                    .await
                    .map(drop)
            }
            Err(e) => Err(e),
        }
    }

    /// Sends a command [`Reply`] to the chat that issued the command.
    ///
    /// # Errors
    ///
    /// See [`TelegramClient::send_message`].
    pub async fn reply(&self, chat: &ChatId, reply: &Reply) -> Result<(), TelegramError> {
        self.send_message(chat, &reply.text, reply.parse_mode).await
    }

    /// Long-polls for new message updates.
    ///
    /// `offset` should be one past the highest `update_id` already handled so
    /// Telegram drops confirmed updates.
    ///
    /// # Errors
    ///
    /// - [`TelegramError::Api`] if the API rejects the call (for example a
    ///   409 conflict with another poller).
    /// - [`TelegramError::Http`] on network failure or timeout.
    /// - [`TelegramError::Deserialize`] if the updates cannot be parsed.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let mut body = serde_json::json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = serde_json::Value::from(offset);
        }

        let request_timeout = Duration::from_secs(timeout_secs + LONG_POLL_GRACE_SECS);
        let updates = self
            .call::<Vec<Update>>("getUpdates", &body, Some(request_timeout))
            .await?;
        Ok(updates.unwrap_or_default())
    }

    /// POSTs `body` to a Bot API method and unwraps the response envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<Option<T>, TelegramError> {
        let mut request = self.client.post(self.method_url(method)).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let text = response.text().await.map_err(reqwest::Error::without_url)?;

        let envelope: ApiResponse<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Api {
                    code: i64::from(status.as_u16()),
                    description: text,
                });
            }
            Err(source) => {
                return Err(TelegramError::Deserialize {
                    context: method.to_string(),
                    source,
                });
            }
        };

        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope
                    .error_code
                    .unwrap_or_else(|| i64::from(status.as_u16())),
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown Telegram API error".to_string()),
            });
        }

        Ok(envelope.result)
    }
}

/// A 400 whose description reports unparseable entities or markup.
fn is_markup_rejection(code: i64, description: &str) -> bool {
    let description = description.to_ascii_lowercase();
    code == 400 && (description.contains("parse entities") || description.contains("can't parse"))
}

impl Notifier for TelegramClient {
    async fn send(&self, chat: &ChatId, text: &str) -> Result<(), SendError> {
        self.send_message(chat, text, None)
            .await
            .map_err(SendError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_url_strips_trailing_slash() {
        let client = TelegramClient::with_base_url("123:abc", 30, "http://localhost:9999/")
            .expect("client construction should not fail");
        assert_eq!(
            client.method_url("sendMessage"),
            "http://localhost:9999/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn only_entity_parse_errors_count_as_markup_rejections() {
        assert!(is_markup_rejection(
            400,
            "Bad Request: can't parse entities: Can't find end of the entity starting at byte offset 12"
        ));
        assert!(!is_markup_rejection(400, "Bad Request: chat not found"));
        assert!(!is_markup_rejection(403, "Forbidden: bot was blocked by the user"));
        assert!(!is_markup_rejection(429, "Too Many Requests: retry after 5"));
    }

    #[test]
    fn debug_redacts_token() {
        let client = TelegramClient::new("123:secret", 30).unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret"), "token leaked: {rendered}");
    }
}
