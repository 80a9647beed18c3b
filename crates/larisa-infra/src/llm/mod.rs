//! LLM provider implementations.
//!
//! Contains the OpenRouter implementation of the [`LlmProvider`] trait
//! defined in `larisa-core`, plus [`create_provider`] which builds it from
//! runtime settings.
//!
//! [`LlmProvider`]: larisa_core::llm::provider::LlmProvider

pub mod openrouter;

use std::time::Duration;

use secrecy::SecretString;

use larisa_core::llm::box_provider::BoxLlmProvider;

use self::openrouter::{AppAttribution, OpenRouterProvider};

/// Runtime settings for the completion provider.
pub struct ProviderSettings {
    pub api_key: SecretString,
    pub model: String,
    /// Overrides the OpenRouter base URL when set.
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub attribution: AppAttribution,
}

/// Create a [`BoxLlmProvider`] from [`ProviderSettings`].
pub fn create_provider(settings: ProviderSettings) -> BoxLlmProvider {
    let mut provider = OpenRouterProvider::new(settings.api_key, settings.model)
        .with_timeout(settings.timeout)
        .with_attribution(settings.attribution);
    if let Some(base_url) = settings.base_url {
        provider = provider.with_base_url(base_url);
    }
    BoxLlmProvider::new(provider)
}
