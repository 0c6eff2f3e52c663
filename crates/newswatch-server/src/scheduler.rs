//! Background poll scheduler.
//!
//! Registers the poll job on a [`JobScheduler`]: one run after the initial
//! delay, then one run every poll interval. Runs never overlap; a tick that
//! fires while the previous poll is still in flight is dropped. The state
//! directory's poll lock is also taken, so a concurrent `newswatch-cli poll`
//! against the same state cannot double-send.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use newswatch_core::PollOutcome;
use newswatch_store::FileStateStore;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::AppEngine;

/// Builds and starts the poll scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, a
/// job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    engine: Arc<AppEngine>,
    store: Arc<FileStateStore>,
    initial_delay: Duration,
    interval: Duration,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    let in_flight = Arc::new(Mutex::new(()));

    let first = Job::new_one_shot_async(initial_delay, {
        let engine = Arc::clone(&engine);
        let store = Arc::clone(&store);
        let in_flight = Arc::clone(&in_flight);
        move |_uuid, _lock| {
            let engine = Arc::clone(&engine);
            let store = Arc::clone(&store);
            let in_flight = Arc::clone(&in_flight);
            Box::pin(async move { guarded_poll(&engine, &store, &in_flight).await })
        }
    })?;

    let repeated = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let engine = Arc::clone(&engine);
        let store = Arc::clone(&store);
        let in_flight = Arc::clone(&in_flight);
        Box::pin(async move { guarded_poll(&engine, &store, &in_flight).await })
    })?;

    scheduler.add(first).await?;
    scheduler.add(repeated).await?;

    scheduler.start().await?;
    tracing::info!(
        initial_delay_secs = initial_delay.as_secs(),
        interval_secs = interval.as_secs(),
        "scheduler: poll job registered"
    );
    Ok(scheduler)
}

async fn guarded_poll(engine: &AppEngine, store: &FileStateStore, in_flight: &Mutex<()>) {
    let ran = run_exclusive(in_flight, async {
        match store.try_lock_poll() {
            Ok(Some(_lock)) => run_poll(engine).await,
            Ok(None) => {
                tracing::warn!(
                    dir = %store.dir().display(),
                    "scheduler: another process is polling this state dir; skipping this tick"
                );
            }
            Err(e) => tracing::error!(error = %e, "scheduler: failed to take poll lock"),
        }
    })
    .await;

    if !ran {
        tracing::warn!("scheduler: previous poll still running; skipping this tick");
    }
}

/// Runs `task` only if no other task holds `guard`. Returns whether it ran.
pub(crate) async fn run_exclusive<F>(guard: &Mutex<()>, task: F) -> bool
where
    F: Future<Output = ()>,
{
    let Ok(_held) = guard.try_lock() else {
        return false;
    };
    task.await;
    true
}

async fn run_poll(engine: &AppEngine) {
    match engine.poll_once().await {
        Ok(PollOutcome::AlreadySeen { article_id }) => {
            tracing::debug!(article_id = %article_id, "scheduler: no new article");
        }
        Ok(PollOutcome::Sent { article }) => {
            tracing::info!(article_id = %article.id, "scheduler: new article sent");
        }
        Ok(PollOutcome::Filtered { article }) => {
            tracing::info!(article_id = %article.id, "scheduler: new article filtered out");
        }
        Ok(PollOutcome::SendFailed { article, error }) => {
            tracing::error!(
                article_id = %article.id,
                error = %error,
                "scheduler: new article could not be delivered"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: poll failed; retrying next tick");
        }
    }
}
