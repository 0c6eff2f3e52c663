use newswatch_core::SendError;
use thiserror::Error;

/// Errors returned by the Telegram Bot API client.
///
/// HTTP errors never carry the request URL, since it embeds the bot token.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Network or TLS failure, or a timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Bot API answered with `"ok": false`.
    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<TelegramError> for SendError {
    fn from(err: TelegramError) -> Self {
        match err {
            TelegramError::Api { code, description } => SendError::Rejected { code, description },
            e @ (TelegramError::Http(_) | TelegramError::Deserialize { .. }) => {
                SendError::Transport(e.to_string())
            }
        }
    }
}
