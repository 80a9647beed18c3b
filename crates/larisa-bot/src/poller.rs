//! Long-polling loop feeding Telegram updates to the dispatcher.
//!
//! Each text message is handled in its own task so a slow completion never
//! blocks polling. On shutdown the loop stops polling and gives in-flight
//! tasks a bounded amount of time to finish.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use larisa_infra::telegram::{TelegramClient, Update};
use larisa_types::chat::IncomingMessage;
use larisa_types::error::TransportError;

/// Source of Bot API updates.
pub trait UpdateSource: Send + Sync {
    fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<Update>, TransportError>> + Send;
}

impl UpdateSource for TelegramClient {
    fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<Update>, TransportError>> + Send {
        TelegramClient::get_updates(self, offset, timeout)
    }
}

/// Timings for [`run_polling`].
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Server-side wait of each `getUpdates` call.
    pub long_poll: Duration,
    /// Back-off after a failed poll.
    pub retry_delay: Duration,
    /// How long shutdown waits for in-flight handlers.
    pub drain_timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            long_poll: Duration::from_secs(30),
            retry_delay: Duration::from_secs(3),
            drain_timeout: Duration::from_secs(10),
        }
    }
}

/// Poll `source` until `shutdown` is cancelled, spawning `handler` for every
/// text message.
///
/// `handler` itself runs on the polling task in update order; only the
/// returned future is spawned.
pub async fn run_polling<S, H, Fut>(
    source: &S,
    handler: H,
    config: &PollerConfig,
    shutdown: CancellationToken,
) where
    S: UpdateSource,
    H: Fn(IncomingMessage) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut offset: Option<i64> = None;
    let mut tasks = JoinSet::new();

    info!("polling for updates");
    loop {
        while let Some(result) = tasks.try_join_next() {
            log_task_result(result);
        }

        let polled = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            polled = source.get_updates(offset, config.long_poll) => polled,
        };

        match polled {
            Ok(updates) => {
                for update in updates {
                    let update_id = update.update_id;
                    offset = Some(update_id + 1);
                    match update.into_incoming() {
                        Some(message) => {
                            tasks.spawn(handler(message));
                        }
                        None => debug!(update_id, "skipping non-text update"),
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch updates, retrying");
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(config.retry_delay) => {}
                }
            }
        }
    }

    if !tasks.is_empty() {
        info!(in_flight = tasks.len(), "waiting for in-flight messages");
    }
    let drained = tokio::time::timeout(config.drain_timeout, async {
        while let Some(result) = tasks.join_next().await {
            log_task_result(result);
        }
    })
    .await;
    if drained.is_err() {
        warn!(aborted = tasks.len(), "shutdown timed out, aborting in-flight messages");
        tasks.shutdown().await;
    }
}

fn log_task_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            error!(error = %e, "message handler panicked");
        }
    }
}
