//! Operator command loop.
//!
//! Long-polls Telegram `getUpdates`, dispatches `/key` and `/resetid` to the
//! [`CommandHandler`], and replies to the chat that sent the command.

use std::sync::Arc;
use std::time::Duration;

use newswatch_core::{parse_command, ChatId, CommandHandler, StateStore};
use newswatch_telegram::{TelegramClient, Update};

const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Runs the command loop until the task is cancelled.
pub async fn run_command_loop<S: StateStore>(
    telegram: Arc<TelegramClient>,
    handler: CommandHandler<S>,
    timeout_secs: u64,
) {
    let mut offset: Option<i64> = None;
    tracing::info!("commands: listening for operator commands");

    loop {
        let updates = match telegram.get_updates(offset, timeout_secs).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::error!(error = %e, "commands: getUpdates failed");
                tokio::time::sleep(ERROR_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(next_offset(offset, &update));
            handle_update(&telegram, &handler, update).await;
        }
    }
}

/// Offset that acknowledges `update` without going backwards.
fn next_offset(current: Option<i64>, update: &Update) -> i64 {
    let candidate = update.update_id + 1;
    current.map_or(candidate, |offset| offset.max(candidate))
}

async fn handle_update<S: StateStore>(
    telegram: &TelegramClient,
    handler: &CommandHandler<S>,
    update: Update,
) {
    let Some(message) = update.message else {
        return;
    };
    let Some(command) = message.text.as_deref().and_then(parse_command) else {
        return;
    };

    let chat = ChatId::from(message.chat.id);
    tracing::info!(chat = %chat, command = ?command, "commands: received");

    let reply = handler.handle(&command);
    if let Err(e) = telegram.reply(&chat, &reply).await {
        tracing::error!(chat = %chat, error = %e, "commands: failed to send reply");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(id: i64) -> Update {
        Update {
            update_id: id,
            message: None,
        }
    }

    #[test]
    fn first_offset_is_one_past_update() {
        assert_eq!(next_offset(None, &update(41)), 42);
    }

    #[test]
    fn offset_never_moves_backwards() {
        assert_eq!(next_offset(Some(100), &update(41)), 100);
        assert_eq!(next_offset(Some(100), &update(120)), 121);
    }
}
