//! LLM request/response types for Larisa.
//!
//! These types model the data shapes exchanged with the completion service:
//! conversation turns, the outbound request, the extracted reply, and the
//! error taxonomy the orchestrator turns into user-facing replies.

use serde::{Deserialize, Serialize};

/// Role of a turn in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single turn in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request to the completion service.
///
/// Serializes directly into the OpenAI-compatible wire body
/// `{"model": ..., "messages": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

/// Reply extracted from a successful completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Provider-assigned response id, when present.
    #[serde(default)]
    pub id: Option<String>,
    /// `choices[0].message.content`.
    pub content: String,
    /// Model that actually served the request (may differ from the requested one).
    #[serde(default)]
    pub model: Option<String>,
}

/// Errors from completion provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The service answered with a non-success HTTP status.
    ///
    /// `body` is the raw response text; the orchestrator decides how much of
    /// it reaches the user.
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("completion contained no message content")]
    EmptyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_serde() {
        let role = MessageRole::Assistant;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_completion_request_wire_shape() {
        let request = CompletionRequest {
            model: "deepseek/deepseek-chat-v3.1:free".to_string(),
            messages: vec![Message::user("hi"), Message::assistant("hello")],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "deepseek/deepseek-chat-v3.1:free",
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"}
                ]
            })
        );
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Api {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: not found");
        assert_eq!(LlmError::Timeout(30).to_string(), "request timed out after 30s");
    }
}
