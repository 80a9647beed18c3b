//! Completion request orchestration for Larisa.
//!
//! `RelayOrchestrator` runs the full lifecycle of one user text message:
//! record the turn, show a typing indicator and an animated status message,
//! call the completion provider, tear the status message down, and deliver
//! either the formatted reply or an error reply.
//!
//! Requests from the same user are serialized in arrival order: a second
//! message waits until the first has been answered, so a user never has two
//! status messages and their history stays ordered.

use std::future::Future;

use tracing::{Instrument, debug, info, info_span, warn};

use larisa_types::chat::{ChatAction, ChatId, IncomingMessage, ParseMode, UserId};
use larisa_types::error::TransportError;
use larisa_types::llm::{CompletionRequest, CompletionResponse, LlmError, MessageRole};

use crate::chat::session::SessionStore;
use crate::llm::box_provider::BoxLlmProvider;
use crate::render::chunk::split_message;
use crate::render::format::format_reply;
use crate::transport::box_transport::BoxChatTransport;

use super::config::RelayConfig;
use super::replies;
use super::status::{STATUS_FRAMES, StatusAnimator, StatusHandle, StatusRegistry};
use super::turns::{Turn, TurnQueue};

/// Coordinates sessions, status animation, the provider call and reply delivery.
pub struct RelayOrchestrator {
    transport: BoxChatTransport,
    provider: BoxLlmProvider,
    sessions: SessionStore,
    statuses: StatusRegistry,
    animator: StatusAnimator,
    turns: TurnQueue,
    config: RelayConfig,
}

impl RelayOrchestrator {
    pub fn new(
        transport: BoxChatTransport,
        provider: BoxLlmProvider,
        sessions: SessionStore,
        config: RelayConfig,
    ) -> Self {
        let animator = StatusAnimator::new(transport.clone(), config.frame_interval);
        Self {
            transport,
            provider,
            sessions,
            statuses: StatusRegistry::new(),
            animator,
            turns: TurnQueue::new(),
            config,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[cfg(test)]
    pub(crate) fn statuses(&self) -> &StatusRegistry {
        &self.statuses
    }

    /// Reserve the sender's next turn. Must be called in arrival order.
    pub fn reserve_turn(&self, user_id: UserId) -> Turn {
        self.turns.reserve(user_id)
    }

    /// Answer one user text message.
    ///
    /// The turn is reserved when this is called, not when the returned
    /// future is first polled.
    pub fn handle_message<'a>(
        &'a self,
        message: &'a IncomingMessage,
    ) -> impl Future<Output = Result<(), TransportError>> + Send + 'a {
        let turn = self.reserve_turn(message.user_id);
        self.handle_in_turn(turn, message)
    }

    /// Answer one user text message once `turn` comes up.
    ///
    /// Provider failures are reported to the user and are not errors here.
    /// Only transport failures while sending the typing indicator or the
    /// final reply propagate to the caller.
    pub async fn handle_in_turn(
        &self,
        mut turn: Turn,
        message: &IncomingMessage,
    ) -> Result<(), TransportError> {
        turn.ready().await;

        let user_id = message.user_id;
        let chat_id = message.chat_id;

        self.sessions
            .append(user_id, MessageRole::User, message.text.as_str());
        self.transport
            .send_chat_action(chat_id, ChatAction::Typing)
            .await?;

        let status = self.begin_status(user_id, chat_id).await;

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: self.sessions.window(user_id, self.config.history_window),
        };
        let span = info_span!(
            "chat",
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.response.id = tracing::field::Empty,
            messages = request.messages.len(),
            %user_id,
        );
        let outcome = self
            .provider
            .complete(&request)
            .instrument(span.clone())
            .await;
        if let Ok(CompletionResponse { id: Some(id), .. }) = &outcome {
            span.record("gen_ai.response.id", id.as_str());
        }

        if let Some(handle) = status {
            self.settle_status(user_id, handle).await;
        }

        match outcome {
            Ok(response) => {
                info!(
                    %user_id,
                    chars = response.content.chars().count(),
                    model = response.model.as_deref().unwrap_or(request.model.as_str()),
                    "completion received"
                );
                self.sessions
                    .append(user_id, MessageRole::Assistant, response.content.as_str());
                let formatted = format_reply(&response.content);
                self.send_reply(chat_id, &formatted).await
            }
            Err(LlmError::Api { status, body }) => {
                warn!(%user_id, status, "completion API returned an error");
                self.send_with_fallback(chat_id, &replies::api_error(status, &body))
                    .await
            }
            Err(e) => {
                warn!(%user_id, error = %e, "completion request failed");
                self.send_with_fallback(chat_id, &replies::request_failed(&e))
                    .await
            }
        }
    }

    /// Post the status message and start animating it.
    ///
    /// Returns `None` if the message could not be posted; the request then
    /// proceeds without a status message.
    async fn begin_status(&self, user_id: UserId, chat_id: ChatId) -> Option<StatusHandle> {
        match self
            .transport
            .send_message(chat_id, STATUS_FRAMES[0], ParseMode::Plain)
            .await
        {
            Ok(message_id) => {
                let handle = StatusHandle::new(chat_id, message_id);
                self.statuses.register(user_id, handle.clone());
                // Detached; the task ends on its own once the handle is deactivated.
                let _animation = self.animator.start(&handle);
                Some(handle)
            }
            Err(e) => {
                warn!(%user_id, %chat_id, error = %e, "could not post status message");
                None
            }
        }
    }

    /// Stop the animation, wait for an in-flight edit to land, then delete the
    /// status message and forget the handle. Never fails.
    async fn settle_status(&self, user_id: UserId, handle: StatusHandle) {
        handle.deactivate();
        tokio::time::sleep(self.config.settle_delay).await;

        if let Err(e) = self
            .transport
            .delete_message(handle.chat_id, handle.message_id)
            .await
        {
            warn!(
                %user_id,
                message_id = %handle.message_id,
                error = %e,
                "could not delete status message"
            );
        }
        self.statuses.remove(user_id, handle.message_id);
    }

    /// Send a formatted reply, split into transport-sized chunks when needed.
    async fn send_reply(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError> {
        let chunks = if text.chars().count() > self.config.max_message_len {
            split_message(text, self.config.max_message_len)
        } else {
            vec![text.to_string()]
        };
        debug!(%chat_id, chunks = chunks.len(), "sending reply");

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                self.transport
                    .send_chat_action(chat_id, ChatAction::Typing)
                    .await?;
                tokio::time::sleep(self.config.chunk_pause).await;
            }
            self.send_with_fallback(chat_id, chunk).await?;
        }
        Ok(())
    }

    /// Send as Markdown, resending as plain text if the renderer rejects it.
    async fn send_with_fallback(&self, chat_id: ChatId, text: &str) -> Result<(), TransportError> {
        match self
            .transport
            .send_message(chat_id, text, ParseMode::Markdown)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.is_bad_request() => {
                debug!(%chat_id, error = %e, "markdown rejected, resending as plain text");
                self.transport
                    .send_message(chat_id, text, ParseMode::Plain)
                    .await
                    .map(|_| ())
            }
            Err(e) => Err(e),
        }
    }
}
