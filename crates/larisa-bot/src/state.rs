//! Application state wiring the relay together.
//!
//! AppState pins the core ports to the concrete infra adapters: the Telegram
//! client is shared between the poller and the chat transport.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use larisa_core::chat::dispatcher::Dispatcher;
use larisa_core::chat::session::SessionStore;
use larisa_core::relay::config::RelayConfig;
use larisa_core::relay::orchestrator::RelayOrchestrator;
use larisa_core::transport::box_transport::BoxChatTransport;
use larisa_infra::llm::openrouter::AppAttribution;
use larisa_infra::llm::{ProviderSettings, create_provider};
use larisa_infra::telegram::TelegramClient;

use crate::cli::Cli;

/// Shared application state.
pub struct AppState {
    pub telegram: Arc<TelegramClient>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Build every component from parsed configuration.
    ///
    /// Secrets are moved into `SecretString` here and never cloned out again.
    pub fn init(cli: Cli) -> Self {
        let telegram = Arc::new(TelegramClient::new(SecretString::from(cli.telegram_token)));
        let transport = BoxChatTransport::from_arc(telegram.clone());

        let provider = create_provider(ProviderSettings {
            api_key: SecretString::from(cli.api_key),
            model: cli.model.clone(),
            base_url: Some(cli.api_base),
            timeout: Duration::from_secs(cli.request_timeout_secs),
            attribution: AppAttribution {
                referer: None,
                title: Some("Larisa".to_string()),
            },
        });

        let config = RelayConfig {
            history_window: cli.history_window,
            ..RelayConfig::new(cli.model)
        };
        let relay = Arc::new(RelayOrchestrator::new(
            transport.clone(),
            provider,
            SessionStore::new(),
            config,
        ));

        Self {
            telegram,
            dispatcher: Dispatcher::new(relay, transport),
        }
    }
}
