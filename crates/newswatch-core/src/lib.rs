pub mod app_config;
pub mod article;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod notification;
pub mod store;

pub use app_config::{AppConfig, StateConfig};
pub use article::{Article, ChatId, MISSING_LINK, MISSING_TITLE};
pub use commands::{parse_command, Command, CommandHandler, ParseMode, Reply};
pub use config::{load_app_config, load_app_config_from_env, load_state_config};
pub use engine::{
    decide, is_new, ArticleSource, Decision, Engine, EngineConfig, Notifier, PollOutcome,
};
pub use error::{CommandError, ConfigError, FetchError, PollError, SendError, StoreError};
pub use filter::{matches, normalize_keyword};
pub use notification::{format_notification, DEFAULT_HEADER};
pub use store::{default_filter_keywords, StateStore, DEFAULT_FILTER_KEYWORDS};
