//! Telegram Bot API wire types.
//!
//! Only the subset the relay uses is modelled. See
//! <https://core.telegram.org/bots/api> for the full shapes.

use serde::{Deserialize, Serialize};

use larisa_types::chat::{ChatAction, ChatId, IncomingMessage, MessageId, UserId};

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TgMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgMessage {
    pub message_id: MessageId,
    #[serde(default)]
    pub from: Option<TgUser>,
    pub chat: TgChat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgUser {
    pub id: UserId,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgChat {
    pub id: ChatId,
}

impl Update {
    /// The text message carried by this update, if any.
    ///
    /// Updates without a message, without text (photos, stickers, ...) or
    /// without a sender are skipped.
    pub fn into_incoming(self) -> Option<IncomingMessage> {
        let message = self.message?;
        let text = message.text?;
        let from = message.from?;
        Some(IncomingMessage {
            chat_id: message.chat.id,
            user_id: from.id,
            message_id: message.message_id,
            text,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: ChatId,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct SendChatAction {
    pub chat_id: ChatId,
    pub action: ChatAction,
}

#[derive(Debug, Serialize)]
pub struct EditMessageText<'a> {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DeleteMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

#[derive(Debug, Serialize)]
pub struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}
