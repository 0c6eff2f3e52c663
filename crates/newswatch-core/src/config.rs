use std::path::PathBuf;

use chrono_tz::Tz;

use crate::app_config::{AppConfig, StateConfig};
use crate::article::ChatId;
use crate::notification::DEFAULT_HEADER;
use crate::ConfigError;

const DEFAULT_API_URL: &str =
    "https://indodax.com/academy/wp-json/api/v1/latest-article?lang=id&category=semua&label_category=";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load the state-directory configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` first. Unlike [`load_app_config`], the bot
/// token is not required.
///
/// # Errors
///
/// Returns `ConfigError` if `CHAT_ID` is missing.
pub fn load_state_config() -> Result<StateConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_state_config(&|key: &str| std::env::var(key))
}

/// Returns the value of `var`, treating unset and blank values alike.
fn non_blank<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    lookup(var).ok().filter(|v| !v.trim().is_empty())
}

fn require<F>(lookup: &F, var: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    non_blank(lookup, var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

fn or_default<F>(lookup: &F, var: &str, default: &str) -> String
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    non_blank(lookup, var).unwrap_or_else(|| default.to_string())
}

fn build_state_config<F>(lookup: &F) -> Result<StateConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    Ok(StateConfig {
        chat_id: ChatId::new(require(lookup, "CHAT_ID")?.trim()),
        log_level: or_default(lookup, "NEWSWATCH_LOG_LEVEL", "info"),
        state_dir: PathBuf::from(or_default(lookup, "NEWSWATCH_STATE_DIR", ".")),
    })
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(&lookup, var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let telegram_token = require(&lookup, "TELEGRAM_TOKEN")?;
    let StateConfig {
        chat_id,
        log_level,
        state_dir,
    } = build_state_config(&lookup)?;

    let api_url = or_default(&lookup, "NEWSWATCH_API_URL", DEFAULT_API_URL);

    let poll_interval_secs = parse_u64("NEWSWATCH_POLL_INTERVAL_SECS", "30")?;
    if poll_interval_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEWSWATCH_POLL_INTERVAL_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let initial_delay_secs = parse_u64("NEWSWATCH_INITIAL_DELAY_SECS", "5")?;
    let http_timeout_secs = parse_u64("NEWSWATCH_HTTP_TIMEOUT_SECS", "30")?;
    let updates_timeout_secs = parse_u64("NEWSWATCH_UPDATES_TIMEOUT_SECS", "30")?;

    let user_agent = or_default(
        &lookup,
        "NEWSWATCH_USER_AGENT",
        "newswatch/0.1 (article-notifier)",
    );

    let timezone = or_default(&lookup, "NEWSWATCH_TIMEZONE", "Asia/Jakarta")
        .trim()
        .parse::<Tz>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "NEWSWATCH_TIMEZONE".to_string(),
            reason: e.to_string(),
        })?;

    let header = or_default(&lookup, "NEWSWATCH_HEADER", DEFAULT_HEADER);

    Ok(AppConfig {
        telegram_token,
        chat_id,
        log_level,
        api_url,
        state_dir,
        poll_interval_secs,
        initial_delay_secs,
        http_timeout_secs,
        updates_timeout_secs,
        user_agent,
        timezone,
        header,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
