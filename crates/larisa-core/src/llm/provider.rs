//! LlmProvider trait definition.
//!
//! This is the core abstraction the completion backends implement.
//! Uses RPITIT for `complete`; `BoxLlmProvider` adds dynamic dispatch.

use larisa_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion service backends (OpenRouter, test doubles, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// Implementations live in larisa-infra (e.g., `OpenRouterProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send a completion request and receive the extracted reply.
    ///
    /// A non-success HTTP status must surface as [`LlmError::Api`] carrying
    /// the raw body, so callers can show the service's own error message.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
