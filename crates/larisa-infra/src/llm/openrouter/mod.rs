//! OpenRouterProvider -- concrete [`LlmProvider`] implementation for OpenRouter.
//!
//! Sends requests to the OpenAI-compatible chat completions endpoint
//! (`/api/v1/chat/completions`) with bearer authentication.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use larisa_core::llm::provider::LlmProvider;
use larisa_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use self::types::{ChatCompletionRequest, ChatCompletionResponse};

/// Default OpenRouter API base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Optional app attribution headers OpenRouter uses for its rankings.
#[derive(Debug, Clone, Default)]
pub struct AppAttribution {
    /// Sent as `HTTP-Referer`.
    pub referer: Option<String>,
    /// Sent as `X-Title`.
    pub title: Option<String>,
}

/// OpenRouter completion provider.
///
/// Does NOT derive Debug: the API key must never reach log output.
pub struct OpenRouterProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    timeout: Duration,
    attribution: AppAttribution,
}

impl OpenRouterProvider {
    /// Create a provider with the default base URL and a 30 s timeout.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenRouter API key wrapped in SecretString
    /// * `model` - Model id used when a request does not name one
    pub fn new(api_key: SecretString, model: String) -> Self {
        Self {
            client: build_client(DEFAULT_TIMEOUT),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            timeout: DEFAULT_TIMEOUT,
            attribution: AppAttribution::default(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self.timeout = timeout;
        self
    }

    pub fn with_attribution(mut self, attribution: AppAttribution) -> Self {
        self.attribution = attribution;
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout.as_secs())
        } else {
            LlmError::Http(e.without_url().to_string())
        }
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("failed to create reqwest client")
}

impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        let body = ChatCompletionRequest {
            model,
            messages: &request.messages,
        };
        let url = self.url("/chat/completions");

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body);
        if let Some(referer) = &self.attribution.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.attribution.title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;
        if !status.is_success() {
            debug!(status = status.as_u16(), "openrouter returned an error status");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        Ok(CompletionResponse {
            id: parsed.id,
            content,
            model: parsed.model,
        })
    }
}
