use std::path::PathBuf;

use chrono_tz::Tz;

use crate::article::ChatId;
use crate::engine::EngineConfig;

#[derive(Clone)]
pub struct AppConfig {
    pub telegram_token: String,
    pub chat_id: ChatId,
    pub log_level: String,
    pub api_url: String,
    pub state_dir: PathBuf,
    pub poll_interval_secs: u64,
    pub initial_delay_secs: u64,
    pub http_timeout_secs: u64,
    pub updates_timeout_secs: u64,
    pub user_agent: String,
    pub timezone: Tz,
    pub header: String,
}

/// The subset of configuration needed to work on the state directory alone.
///
/// Loading it never requires the bot token, so the filter and marker can be
/// inspected and edited without Telegram access.
#[derive(Debug, Clone)]
pub struct StateConfig {
    pub chat_id: ChatId,
    pub log_level: String,
    pub state_dir: PathBuf,
}

impl AppConfig {
    /// Engine settings derived from this configuration.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            destination: self.chat_id.clone(),
            timezone: self.timezone,
            header: self.header.clone(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("telegram_token", &"[redacted]")
            .field("chat_id", &self.chat_id)
            .field("log_level", &self.log_level)
            .field("api_url", &self.api_url)
            .field("state_dir", &self.state_dir)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("initial_delay_secs", &self.initial_delay_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("updates_timeout_secs", &self.updates_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("timezone", &self.timezone)
            .field("header", &self.header)
            .finish()
    }
}
