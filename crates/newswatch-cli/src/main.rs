use std::sync::Arc;

use clap::{Parser, Subcommand};
use newswatch_academy::AcademyClient;
use newswatch_core::{
    AppConfig, Command, CommandHandler, Engine, PollOutcome, StateConfig, StateStore,
};
use newswatch_store::FileStateStore;
use newswatch_telegram::TelegramClient;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "newswatch-cli")]
#[command(about = "Academy article notifier operator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a single poll cycle now
    Poll,
    /// Show the filter keywords, or toggle WORD in or out of the filter
    Key {
        /// Keyword to add or remove
        word: Option<String>,
    },
    /// Clear the last-seen marker so the latest article is evaluated again
    Resetid,
    /// Show the last-seen article id and the filter keywords
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("newswatch-cli ready; run with --help for commands");
        return Ok(());
    };

    // Only `poll` talks to the network; the other commands need no token.
    let state = newswatch_core::load_state_config()?;
    init_tracing(&state.log_level)?;
    let store = Arc::new(FileStateStore::open(&state.state_dir)?);

    match command {
        Commands::Poll => {
            let config = newswatch_core::load_app_config()?;
            run_poll(&config, store).await?;
        }
        Commands::Key { word } => {
            let handler = CommandHandler::new(store, state.chat_id.clone());
            println!("{}", handler.handle(&Command::Key(word)).text);
        }
        Commands::Resetid => {
            let handler = CommandHandler::new(store, state.chat_id.clone());
            println!("{}", handler.handle(&Command::ResetId).text);
        }
        Commands::Status => print_status(&state, store.as_ref())?,
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run_poll(config: &AppConfig, store: Arc<FileStateStore>) -> anyhow::Result<()> {
    let Some(_lock) = store.try_lock_poll()? else {
        anyhow::bail!(
            "another poll is running against {}; try again shortly",
            store.dir().display()
        );
    };

    let source = AcademyClient::new(
        &config.api_url,
        config.http_timeout_secs,
        &config.user_agent,
    )?;
    let telegram = TelegramClient::new(&config.telegram_token, config.http_timeout_secs)?;
    let engine = Engine::new(source, telegram, Arc::clone(&store), config.engine_config());

    let outcome = engine.poll_once().await.inspect_err(|e| {
        tracing::error!(error = %e, "poll failed");
    })?;
    println!("{}", report_outcome(&outcome));
    Ok(())
}

/// Logs a poll outcome and returns the line printed for the operator.
fn report_outcome(outcome: &PollOutcome) -> String {
    match outcome {
        PollOutcome::AlreadySeen { article_id } => {
            tracing::debug!(article_id = %article_id, "no new article");
            format!("No new article (latest id {article_id})")
        }
        PollOutcome::Sent { article } => {
            tracing::info!(article_id = %article.id, "new article sent");
            format!("Sent article {}: {}", article.id, article.title)
        }
        PollOutcome::Filtered { article } => {
            tracing::info!(article_id = %article.id, "new article filtered out");
            format!("Filtered out article {}: {}", article.id, article.title)
        }
        PollOutcome::SendFailed { article, error } => {
            tracing::error!(
                article_id = %article.id,
                error = %error,
                "new article could not be delivered"
            );
            format!("Article {} marked seen but not delivered: {error}", article.id)
        }
    }
}

fn print_status(config: &StateConfig, store: &FileStateStore) -> anyhow::Result<()> {
    let last_seen = store.read_last_seen_id()?;
    let keywords = store.read_filter_keywords()?;

    println!("state dir:   {}", config.state_dir.display());
    println!("destination: {}", config.chat_id);
    println!("last seen:   {}", last_seen.as_deref().unwrap_or("(none)"));
    if keywords.is_empty() {
        println!("filter:      (empty, every article is sent)");
    } else {
        let list = keywords.iter().map(String::as_str).collect::<Vec<_>>();
        println!("filter:      {}", list.join(", "));
    }
    Ok(())
}
