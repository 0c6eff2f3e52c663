use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Failures of the persisted state store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record that was asked to be cleared does not exist.
    #[error("no stored last-seen marker")]
    NotFound,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record in {path}: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("failed to encode {record}: {reason}")]
    Encode { record: String, reason: String },
}

/// The article source could not produce a latest article.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, timeout, or a non-2xx response.
    #[error("article source unreachable: {0}")]
    Transport(String),

    /// The payload could not be parsed into an article.
    #[error("malformed article payload: {0}")]
    Malformed(String),

    #[error("article source returned no articles")]
    Empty,
}

/// The notifier could not deliver a message.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("notifier unreachable: {0}")]
    Transport(String),

    #[error("notifier rejected message ({code}): {description}")]
    Rejected { code: i64, description: String },
}

/// A poll cycle that ended before deciding anything, or whose state update failed.
#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("state store: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("keyword is empty")]
    EmptyKeyword,

    #[error(transparent)]
    Store(#[from] StoreError),
}
