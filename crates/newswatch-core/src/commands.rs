//! Operator commands: `/key` and `/resetid`.
//!
//! Handlers act on the [`StateStore`] directly and never touch the poll
//! cycle, so they can interleave with a poll in flight.

use crate::article::ChatId;
use crate::error::{CommandError, StoreError};
use crate::filter::normalize_keyword;
use crate::store::StateStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/key` alone shows the filters, `/key <word>` toggles `<word>`.
    Key(Option<String>),
    ResetId,
}

/// Parses a chat message into a [`Command`].
///
/// Accepts an optional `@BotName` suffix on the command word. Only the first
/// argument of `/key` is used. Returns `None` for anything that is not a
/// known command.
#[must_use]
pub fn parse_command(text: &str) -> Option<Command> {
    let mut parts = text.split_whitespace();
    let head = parts.next()?.strip_prefix('/')?;
    let name = head.split_once('@').map_or(head, |(name, _bot)| name);

    match name {
        "key" => Some(Command::Key(parts.next().map(str::to_string))),
        "resetid" => Some(Command::ResetId),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
}

impl ParseMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ParseMode::Markdown => "Markdown",
        }
    }
}

/// Text returned to whoever issued a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
}

impl Reply {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
        }
    }

    #[must_use]
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: Some(ParseMode::Markdown),
        }
    }
}

pub struct CommandHandler<S> {
    store: S,
    destination: ChatId,
}

impl<S: StateStore> CommandHandler<S> {
    pub fn new(store: S, destination: ChatId) -> Self {
        Self { store, destination }
    }

    /// Runs `command` and renders any failure as a user-visible reply.
    pub fn handle(&self, command: &Command) -> Reply {
        let result = match command {
            Command::Key(None) => self.show_filters(),
            Command::Key(Some(word)) => self.toggle_keyword(word),
            Command::ResetId => self.reset_last_seen(),
        };

        result.unwrap_or_else(|e| {
            tracing::warn!(command = ?command, error = %e, "command failed");
            match (command, e) {
                (Command::ResetId, e) => Reply::plain(format!("Reset failed: {e}")),
                (_, CommandError::EmptyKeyword) => Reply::plain("Keyword must not be empty."),
                (_, e) => Reply::plain(format!("Could not update the filter: {e}")),
            }
        })
    }

    /// Adds the normalized word to the filter set, or removes it if present.
    ///
    /// # Errors
    ///
    /// - [`CommandError::EmptyKeyword`] if the word is blank after trimming.
    /// - [`CommandError::Store`] if the set cannot be read or persisted.
    pub fn toggle_keyword(&self, raw_word: &str) -> Result<Reply, CommandError> {
        let word = normalize_keyword(raw_word);
        if word.is_empty() {
            return Err(CommandError::EmptyKeyword);
        }

        let mut keywords = self.store.read_filter_keywords()?;
        let text = if keywords.remove(&word) {
            format!("Keyword '{word}' removed from the filter.")
        } else {
            keywords.insert(word.clone());
            format!("Keyword '{word}' added to the filter.")
        };
        self.store.write_filter_keywords(&keywords)?;

        tracing::info!(keyword = %word, active = keywords.len(), "filter keyword toggled");
        Ok(Reply::plain(text))
    }

    /// Reports the destination chat and the active keywords.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Store`] if the keyword set cannot be read.
    pub fn show_filters(&self) -> Result<Reply, CommandError> {
        let keywords = self.store.read_filter_keywords()?;
        let body = if keywords.is_empty() {
            "Filter is empty. Every article will be sent.".to_string()
        } else {
            let list = keywords.iter().map(String::as_str).collect::<Vec<_>>();
            format!("Active filter keywords: {}", list.join(", "))
        };
        Ok(Reply::markdown(format!(
            "Destination chat ID: `{}`\n{body}",
            self.destination
        )))
    }

    /// Clears the last-seen marker so the next poll treats the current
    /// latest article as new.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Store`] wrapping [`StoreError::NotFound`] when
    /// there is no marker to clear, or any other store failure.
    pub fn reset_last_seen(&self) -> Result<Reply, CommandError> {
        self.store.clear_last_seen_id().map_err(|e| {
            if matches!(e, StoreError::NotFound) {
                tracing::info!("reset requested with no last-seen marker");
            }
            CommandError::Store(e)
        })?;

        tracing::info!("last-seen marker cleared");
        Ok(Reply::plain(
            "Last-seen marker reset. The latest article will be sent again if it matches the filter.",
        ))
    }
}
