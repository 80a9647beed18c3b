//! In-memory doubles for the transport and provider ports.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use larisa_types::chat::{ChatAction, ChatId, MessageId, ParseMode};
use larisa_types::error::TransportError;
use larisa_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::provider::LlmProvider;
use crate::transport::box_transport::BoxChatTransport;
use crate::transport::port::ChatTransport;

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    Send {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        parse_mode: ParseMode,
    },
    Action {
        chat_id: ChatId,
    },
    Edit {
        message_id: MessageId,
        text: String,
    },
    Delete {
        message_id: MessageId,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum EditFailure {
    NotModified,
    Fatal,
}

#[derive(Default)]
struct MockState {
    calls: Vec<TransportCall>,
    visible: BTreeSet<i64>,
    edit_failure: Option<EditFailure>,
    reject_markdown_containing: Option<String>,
    fail_sends_containing: Option<String>,
    fail_deletes: bool,
}

/// Records every call and tracks which messages are currently visible.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    next_id: Arc<AtomicI64>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> BoxChatTransport {
        BoxChatTransport::new(self.clone())
    }

    pub fn set_edit_failure(&self, failure: Option<EditFailure>) {
        self.state.lock().unwrap().edit_failure = failure;
    }

    /// Reject Markdown sends whose text contains `needle` as a render error.
    pub fn reject_markdown_containing(&self, needle: &str) {
        self.state.lock().unwrap().reject_markdown_containing = Some(needle.to_string());
    }

    /// Fail every send whose text contains `needle` with a non-render error.
    pub fn fail_sends_containing(&self, needle: &str) {
        self.state.lock().unwrap().fail_sends_containing = Some(needle.to_string());
    }

    /// Fail every delete. The message stays visible.
    pub fn fail_deletes(&self) {
        self.state.lock().unwrap().fail_deletes = true;
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Texts of successfully sent messages, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TransportCall::Send { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn edit_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, TransportCall::Edit { .. }))
            .count()
    }

    pub fn visible_count(&self) -> usize {
        self.state.lock().unwrap().visible.len()
    }
}

impl ChatTransport for MockTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: ParseMode,
    ) -> Result<MessageId, TransportError> {
        let mut state = self.state.lock().unwrap();
        if let Some(needle) = &state.fail_sends_containing {
            if text.contains(needle.as_str()) {
                return Err(TransportError::Api {
                    code: 403,
                    description: "Forbidden: bot was blocked by the user".to_string(),
                });
            }
        }
        if parse_mode == ParseMode::Markdown {
            if let Some(needle) = &state.reject_markdown_containing {
                if text.contains(needle.as_str()) {
                    return Err(TransportError::BadRequest {
                        description: "Bad Request: can't parse entities".to_string(),
                    });
                }
            }
        }
        let message_id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        state.visible.insert(message_id.0);
        state.calls.push(TransportCall::Send {
            chat_id,
            message_id,
            text: text.to_string(),
            parse_mode,
        });
        Ok(message_id)
    }

    async fn send_chat_action(
        &self,
        chat_id: ChatId,
        _action: ChatAction,
    ) -> Result<(), TransportError> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(TransportCall::Action { chat_id });
        Ok(())
    }

    async fn edit_message_text(
        &self,
        _chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TransportCall::Edit {
            message_id,
            text: text.to_string(),
        });
        match state.edit_failure {
            None => Ok(()),
            Some(EditFailure::NotModified) => Err(TransportError::BadRequest {
                description: "Bad Request: message is not modified".to_string(),
            }),
            Some(EditFailure::Fatal) => Err(TransportError::BadRequest {
                description: "Bad Request: message to edit not found".to_string(),
            }),
        }
    }

    async fn delete_message(
        &self,
        _chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TransportCall::Delete { message_id });
        if state.fail_deletes {
            return Err(TransportError::BadRequest {
                description: "Bad Request: message can't be deleted".to_string(),
            });
        }
        state.visible.remove(&message_id.0);
        Ok(())
    }
}

type Responder = dyn Fn() -> Result<CompletionResponse, LlmError> + Send + Sync;

/// Provider returning a scripted outcome after an optional delay.
#[derive(Clone)]
pub struct MockProvider {
    responder: Arc<Responder>,
    delay: Duration,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    pub fn new(
        responder: impl Fn() -> Result<CompletionResponse, LlmError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Arc::new(responder),
            delay: Duration::ZERO,
            requests: Arc::default(),
        }
    }

    /// Always reply with `content`.
    pub fn replying(content: &str) -> Self {
        let content = content.to_string();
        Self::new(move || {
            Ok(CompletionResponse {
                id: Some("gen-1".to_string()),
                content: content.clone(),
                model: None,
            })
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn boxed(&self) -> BoxLlmProvider {
        BoxLlmProvider::new(self.clone())
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.responder)()
    }
}
