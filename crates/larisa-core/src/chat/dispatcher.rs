//! Routes inbound messages to command handlers or the completion relay.
//!
//! The dispatcher is also the global error callback: an error escaping a
//! handler is logged and answered with a generic apology. It never
//! propagates, so one failed request cannot take the poller down.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use larisa_types::chat::{IncomingMessage, ParseMode};
use larisa_types::error::TransportError;

use crate::relay::orchestrator::RelayOrchestrator;
use crate::relay::replies;
use crate::relay::turns::Turn;
use crate::transport::box_transport::BoxChatTransport;

use super::commands::{self, BotCommand};

/// Entry point for every inbound text message.
#[derive(Clone)]
pub struct Dispatcher {
    relay: Arc<RelayOrchestrator>,
    transport: BoxChatTransport,
    bot_username: Option<String>,
}

impl Dispatcher {
    pub fn new(relay: Arc<RelayOrchestrator>, transport: BoxChatTransport) -> Self {
        Self {
            relay,
            transport,
            bot_username: None,
        }
    }

    /// Only `/cmd@<username>` commands addressed to this bot are handled.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Handle one message to completion. Errors are reported, not returned.
    ///
    /// The sender's turn is reserved before this returns, so futures created
    /// in arrival order run in arrival order for each user, commands included.
    pub fn dispatch(&self, message: IncomingMessage) -> impl Future<Output = ()> + Send + 'static + use<> {
        let turn = self.relay.reserve_turn(message.user_id);
        let this = self.clone();
        async move {
            if let Err(e) = this.route(turn, &message).await {
                this.on_error(&message, e).await;
            }
        }
    }

    async fn route(&self, mut turn: Turn, message: &IncomingMessage) -> Result<(), TransportError> {
        let Some(command) = commands::parse(&message.text, self.bot_username.as_deref()) else {
            return self.relay.handle_in_turn(turn, message).await;
        };
        turn.ready().await;

        match command {
            BotCommand::Start => {
                info!(user_id = %message.user_id, "start command");
                self.transport
                    .send_message(message.chat_id, replies::GREETING, ParseMode::Plain)
                    .await?;
            }
            BotCommand::Clear => {
                info!(
                    user_id = %message.user_id,
                    turns = self.relay.sessions().len(message.user_id),
                    "clearing conversation history"
                );
                self.relay.sessions().clear(message.user_id);
                self.transport
                    .send_message(message.chat_id, replies::HISTORY_CLEARED, ParseMode::Plain)
                    .await?;
            }
            BotCommand::Unknown(name) => {
                debug!(user_id = %message.user_id, command = %name, "ignoring unknown command");
            }
            BotCommand::ForOtherBot(name) => {
                debug!(user_id = %message.user_id, command = %name, "command addressed to another bot");
            }
        }
        Ok(())
    }

    async fn on_error(&self, message: &IncomingMessage, err: TransportError) {
        error!(
            user_id = %message.user_id,
            chat_id = %message.chat_id,
            error = %err,
            "message handler failed"
        );
        if let Err(e) = self
            .transport
            .send_message(message.chat_id, replies::GENERIC_APOLOGY, ParseMode::Markdown)
            .await
        {
            warn!(chat_id = %message.chat_id, error = %e, "could not send apology");
        }
    }
}
