//! Provider for the OpenAI chat-completions API.

use async_trait::async_trait;
use repoquery_core::config::ENV_OPENAI_API_KEY;
use repoquery_core::{Completion, Error, LlmConfig, ModelProvider, Prompt, Result, TokenUsage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Instant;
use tracing::{info, warn};

/// OpenAI API base URL.
const OPENAI_API_URL: &str = "https://api.openai.com/v1";
/// Default model.
const DEFAULT_MODEL: &str = "gpt-5";
/// Model retried once when the primary model fails.
const DEFAULT_FALLBACK_MODEL: &str = "gpt-4o";

/// OpenAI-compatible chat completions provider.
pub struct OpenAiProvider {
    /// HTTP client for API requests.
    client: Client,
    /// Bearer token.
    api_key: String,
    /// API base URL without the `/chat/completions` suffix.
    base_url: String,
    /// Model tried first.
    model: String,
    /// Model tried when the first attempt fails.
    fallback_model: Option<String>,
}

impl OpenAiProvider {
    /// Creates a provider from the `OPENAI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is not set or empty.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(ENV_OPENAI_API_KEY)
            .map_err(|_| Error::MissingApiKey(ENV_OPENAI_API_KEY.to_owned()))?;
        Self::new(api_key)
    }

    /// Creates a provider with the given API key and default models.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided API key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey(ENV_OPENAI_API_KEY.to_owned()));
        }

        Ok(Self {
            client: Client::default(),
            api_key,
            base_url: OPENAI_API_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            fallback_model: Some(DEFAULT_FALLBACK_MODEL.to_owned()),
        })
    }

    /// Creates a provider with models and endpoint taken from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided API key is empty.
    pub fn from_config(api_key: impl Into<String>, config: &LlmConfig) -> Result<Self> {
        Ok(Self::new(api_key)?
            .with_base_url(config.openai_base_url.clone())
            .with_model(config.openai_model.clone())
            .with_fallback_model(Some(config.openai_fallback_model.clone())))
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Sets the primary model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets or clears the fallback model.
    #[must_use]
    pub fn with_fallback_model(mut self, model: Option<String>) -> Self {
        self.fallback_model = model.filter(|name| !name.is_empty());
        self
    }

    /// Primary model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, model: &str, prompt: &Prompt) -> Result<Completion> {
        let start = Instant::now();
        let request = ChatRequest::new(model, prompt);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| Error::Provider(format!("OpenAI request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::Provider(format!("OpenAI API error {status}: {error_text}")));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|err| Error::InvalidResponse(format!("OpenAI response: {err}")))?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_owned())
            .ok_or_else(|| Error::InvalidResponse("No choices in OpenAI response".to_owned()))?;

        let tokens_used = chat_response.usage.map_or_else(TokenUsage::default, |usage| TokenUsage {
            input: usage.prompt_tokens,
            output: usage.completion_tokens,
        });

        Ok(Completion {
            text,
            provider: format!("openai/{model}"),
            latency_ms: start.elapsed().as_millis() as u64,
            tokens_used,
        })
    }
}

/// Request payload for the chat completions endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest {
    /// Model identifier.
    model: String,
    /// System and user messages.
    messages: Vec<ChatMessage>,
    /// Sampling temperature.
    temperature: f32,
    /// Token limit understood by older chat models.
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Token limit understood by reasoning models.
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

impl ChatRequest {
    fn new(model: &str, prompt: &Prompt) -> Self {
        let mut messages = Vec::with_capacity(2);
        if !prompt.system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_owned(),
                content: prompt.system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_owned(),
            content: prompt.user.clone(),
        });

        let uses_completion_tokens = model.starts_with("gpt-5") || model.starts_with('o');
        Self {
            model: model.to_owned(),
            messages,
            temperature: prompt.temperature,
            max_tokens: (!uses_completion_tokens).then_some(prompt.max_tokens),
            max_completion_tokens: uses_completion_tokens.then_some(prompt.max_tokens),
        }
    }
}

/// One chat message.
#[derive(Debug, Serialize)]
struct ChatMessage {
    /// `system` or `user`.
    role: String,
    /// Message text.
    content: String,
}

/// Response payload from the chat completions endpoint.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    /// Candidate completions.
    choices: Vec<ChatChoice>,
    /// Token accounting, absent on some compatible servers.
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    /// Null when the model refused or only called tools.
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, prompt: &Prompt) -> Result<Completion> {
        let primary_error = match self.complete(&self.model, prompt).await {
            Ok(completion) => {
                info!(model = %self.model, "Generated response using OpenAI");
                return Ok(completion);
            }
            Err(err) => err,
        };

        let Some(fallback) = self.fallback_model.as_deref().filter(|name| *name != self.model) else {
            return Err(primary_error);
        };
        warn!(
            model = %self.model,
            error = %primary_error,
            "Model not available, falling back to {fallback}"
        );
        self.complete(fallback, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_rejected() {
        assert!(matches!(
            OpenAiProvider::new("  "),
            Err(Error::MissingApiKey(_))
        ));
    }

    #[test]
    fn test_reasoning_models_use_completion_token_limit() {
        let prompt = Prompt::new("sys", "user").with_max_tokens(123);

        let request = ChatRequest::new("gpt-5", &prompt);
        assert_eq!(request.max_completion_tokens, Some(123));
        assert_eq!(request.max_tokens, None);

        let request = ChatRequest::new("gpt-4o", &prompt);
        assert_eq!(request.max_tokens, Some(123));
        assert_eq!(request.max_completion_tokens, None);
        assert_eq!(request.messages.len(), 2);
    }

    #[test]
    fn test_empty_system_prompt_is_omitted() {
        let request = ChatRequest::new("gpt-4o", &Prompt::new("", "hello"));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let provider = match OpenAiProvider::new("key") {
            Ok(provider) => provider.with_base_url("http://localhost:8080/v1/"),
            Err(err) => panic!("provider creation failed: {err}"),
        };
        assert_eq!(provider.base_url, "http://localhost:8080/v1");
        assert_eq!(provider.model(), DEFAULT_MODEL);
    }
}
