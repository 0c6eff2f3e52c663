use newswatch_core::FetchError;
use thiserror::Error;

/// Errors returned by the academy article client.
#[derive(Debug, Error)]
pub enum AcademyError {
    /// Network or TLS failure, timeout, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The `datas` array was empty.
    #[error("no articles in response from {url}")]
    Empty { url: String },

    /// The newest article had no usable identifier.
    #[error("invalid article id: {0}")]
    InvalidId(String),

    #[error("invalid article URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl From<AcademyError> for FetchError {
    fn from(err: AcademyError) -> Self {
        match err {
            AcademyError::Http(e) => FetchError::Transport(e.to_string()),
            AcademyError::Empty { .. } => FetchError::Empty,
            e @ (AcademyError::Deserialize { .. }
            | AcademyError::InvalidId(_)
            | AcademyError::InvalidUrl { .. }) => FetchError::Malformed(e.to_string()),
        }
    }
}
