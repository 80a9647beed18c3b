//! ChatTransport trait definition.
//!
//! The four primitives the relay needs from a chat client. Implementations
//! live in larisa-infra (e.g., `TelegramClient`).

use larisa_types::chat::{ChatAction, ChatId, MessageId, ParseMode};
use larisa_types::error::TransportError;

/// Trait for chat transports (Telegram, test doubles, ...).
pub trait ChatTransport: Send + Sync {
    /// Send a text message and return the id the transport assigned to it.
    ///
    /// With [`ParseMode::Markdown`] a renderer rejection surfaces as
    /// [`TransportError::BadRequest`].
    fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: ParseMode,
    ) -> impl std::future::Future<Output = Result<MessageId, TransportError>> + Send;

    /// Show a transient status such as "typing..." in the client.
    fn send_chat_action(
        &self,
        chat_id: ChatId,
        action: ChatAction,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;

    /// Replace the text of a message previously sent by the bot.
    fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;

    /// Delete a message previously sent by the bot.
    fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;
}
