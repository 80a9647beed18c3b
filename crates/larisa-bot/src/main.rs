//! Larisa Telegram bot entry point.
//!
//! Binary name: `larisa`
//!
//! Loads `.env`, parses configuration, initializes tracing, then long-polls
//! Telegram until Ctrl+C or SIGTERM.

mod cli;
mod poller;
mod state;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use larisa_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::Cli;
use poller::{PollerConfig, run_polling};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_filter(), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init(cli);

    let me = state.telegram.get_me().await?;
    tracing::info!(
        bot_id = %me.id,
        username = me.username.as_deref().unwrap_or_default(),
        "connected to Telegram"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            tracing::info!("shutdown signal received");
            shutdown.cancel();
        }
    });

    let dispatcher = match me.username {
        Some(username) => state.dispatcher.clone().with_bot_username(username),
        None => state.dispatcher.clone(),
    };
    run_polling(
        state.telegram.as_ref(),
        move |message| dispatcher.dispatch(message),
        &PollerConfig::default(),
        shutdown,
    )
    .await;

    tracing::info!("stopped");
    shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
