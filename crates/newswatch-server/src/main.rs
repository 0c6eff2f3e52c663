mod scheduler;
mod updates;

use std::sync::Arc;
use std::time::Duration;

use newswatch_academy::AcademyClient;
use newswatch_core::{CommandHandler, Engine};
use newswatch_store::FileStateStore;
use newswatch_telegram::TelegramClient;
use tracing_subscriber::EnvFilter;

pub(crate) type AppEngine = Engine<AcademyClient, Arc<TelegramClient>, Arc<FileStateStore>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = newswatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        api_url = %config.api_url,
        destination = %config.chat_id,
        state_dir = %config.state_dir.display(),
        "starting newswatch"
    );

    let store = Arc::new(FileStateStore::open(&config.state_dir)?);
    let source = AcademyClient::new(
        &config.api_url,
        config.http_timeout_secs,
        &config.user_agent,
    )?;
    let telegram = Arc::new(TelegramClient::new(
        &config.telegram_token,
        config.http_timeout_secs,
    )?);

    let engine = Arc::new(Engine::new(
        source,
        Arc::clone(&telegram),
        Arc::clone(&store),
        config.engine_config(),
    ));
    let mut scheduler = scheduler::build_scheduler(
        engine,
        Arc::clone(&store),
        Duration::from_secs(config.initial_delay_secs),
        Duration::from_secs(config.poll_interval_secs),
    )
    .await?;

    let handler = CommandHandler::new(store, config.chat_id.clone());
    let commands = tokio::spawn(updates::run_command_loop(
        telegram,
        handler,
        config.updates_timeout_secs,
    ));

    shutdown_signal().await;
    commands.abort();
    scheduler.shutdown().await?;
    tracing::info!("newswatch stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
