//! BoxChatTransport -- object-safe dynamic dispatch wrapper for ChatTransport.
//!
//! Same blanket-impl pattern as `BoxLlmProvider`. The wrapper is `Clone` so
//! the status animator can own a handle to the transport inside its own task.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use larisa_types::chat::{ChatAction, ChatId, MessageId, ParseMode};
use larisa_types::error::TransportError;

use super::port::ChatTransport;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send + 'a>>;

/// Object-safe version of [`ChatTransport`] with boxed futures.
pub trait ChatTransportDyn: Send + Sync {
    fn send_message_boxed<'a>(
        &'a self,
        chat_id: ChatId,
        text: &'a str,
        parse_mode: ParseMode,
    ) -> BoxFuture<'a, MessageId>;

    fn send_chat_action_boxed(&self, chat_id: ChatId, action: ChatAction) -> BoxFuture<'_, ()>;

    fn edit_message_text_boxed<'a>(
        &'a self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &'a str,
    ) -> BoxFuture<'a, ()>;

    fn delete_message_boxed(&self, chat_id: ChatId, message_id: MessageId) -> BoxFuture<'_, ()>;
}

impl<T: ChatTransport> ChatTransportDyn for T {
    fn send_message_boxed<'a>(
        &'a self,
        chat_id: ChatId,
        text: &'a str,
        parse_mode: ParseMode,
    ) -> BoxFuture<'a, MessageId> {
        Box::pin(self.send_message(chat_id, text, parse_mode))
    }

    fn send_chat_action_boxed(&self, chat_id: ChatId, action: ChatAction) -> BoxFuture<'_, ()> {
        Box::pin(self.send_chat_action(chat_id, action))
    }

    fn edit_message_text_boxed<'a>(
        &'a self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &'a str,
    ) -> BoxFuture<'a, ()> {
        Box::pin(self.edit_message_text(chat_id, message_id, text))
    }

    fn delete_message_boxed(&self, chat_id: ChatId, message_id: MessageId) -> BoxFuture<'_, ()> {
        Box::pin(self.delete_message(chat_id, message_id))
    }
}

/// Type-erased, cheaply cloneable chat transport.
#[derive(Clone)]
pub struct BoxChatTransport {
    inner: Arc<dyn ChatTransportDyn + Send + Sync>,
}

impl BoxChatTransport {
    /// Wrap a concrete `ChatTransport`.
    pub fn new<T: ChatTransport + 'static>(transport: T) -> Self {
        Self {
            inner: Arc::new(transport),
        }
    }

    /// Wrap a transport that is already shared elsewhere.
    pub fn from_arc<T: ChatTransport + 'static>(transport: Arc<T>) -> Self {
        Self { inner: transport }
    }

    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: ParseMode,
    ) -> Result<MessageId, TransportError> {
        self.inner.send_message_boxed(chat_id, text, parse_mode).await
    }

    pub async fn send_chat_action(
        &self,
        chat_id: ChatId,
        action: ChatAction,
    ) -> Result<(), TransportError> {
        self.inner.send_chat_action_boxed(chat_id, action).await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), TransportError> {
        self.inner
            .edit_message_text_boxed(chat_id, message_id, text)
            .await
    }

    pub async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TransportError> {
        self.inner.delete_message_boxed(chat_id, message_id).await
    }
}
