//! Provider for a local Ollama server.

use async_trait::async_trait;
use repoquery_core::{Completion, Error, LlmConfig, ModelProvider, Prompt, Result, TokenUsage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default Ollama endpoint.
const DEFAULT_URL: &str = "http://localhost:11434";
/// Default local model.
const DEFAULT_MODEL: &str = "llama2";
/// Budget for the availability check.
const AVAILABILITY_TIMEOUT: Duration = Duration::from_secs(2);
/// Budget for one generation request.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);
/// Nucleus sampling passed to every request.
const TOP_P: f32 = 0.9;

/// Local model provider using Ollama
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model_name: String,
}

impl OllamaProvider {
    /// Creates a provider for the given model on the default endpoint.
    #[must_use]
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_URL.to_owned(),
            model_name: model_name.into(),
        }
    }

    /// Creates a provider from the `llm` configuration section.
    #[must_use]
    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.ollama_model.clone()).with_url(config.ollama_url.clone())
    }

    /// Points the provider at another Ollama endpoint.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    async fn generate_completion(&self, prompt: &Prompt) -> Result<GenerateResponse> {
        let request = GenerateRequest {
            model: self.model_name.clone(),
            prompt: prompt.user.clone(),
            system: (!prompt.system.is_empty()).then(|| prompt.system.clone()),
            stream: false,
            options: GenerateOptions {
                temperature: prompt.temperature,
                top_p: TOP_P,
                num_predict: prompt.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(GENERATE_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|err| Error::Provider(format!("Ollama request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "Ollama returned error: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|err| Error::InvalidResponse(format!("Failed to parse Ollama response: {err}")))
    }
}

/// Body of `POST /api/generate`.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

/// Non-streaming generation result.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: u64,
    #[serde(default)]
    eval_count: u64,
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/api/version", self.base_url))
            .timeout(AVAILABILITY_TIMEOUT)
            .send()
            .await
            .is_ok_and(|response| response.status().is_success())
    }

    async fn generate(&self, prompt: &Prompt) -> Result<Completion> {
        let start = Instant::now();
        let ollama_response = self.generate_completion(prompt).await?;

        Ok(Completion {
            text: ollama_response.response.trim().to_owned(),
            provider: format!("ollama/{}", self.model_name),
            latency_ms: start.elapsed().as_millis() as u64,
            tokens_used: TokenUsage {
                input: ollama_response.prompt_eval_count,
                output: ollama_response.eval_count,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_provider_creation() {
        let provider = OllamaProvider::new("mistral").with_url("http://ollama:11434/");
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model_name, "mistral");
        assert_eq!(provider.base_url, "http://ollama:11434");
    }

    #[test]
    fn default_provider_uses_local_defaults() {
        let provider = OllamaProvider::default();
        assert_eq!(provider.model_name, "llama2");
        assert_eq!(provider.base_url, DEFAULT_URL);
    }

    #[test]
    fn config_selects_model_and_url() {
        let config = LlmConfig::default();
        let provider = OllamaProvider::from_config(&config);
        assert_eq!(provider.model_name, DEFAULT_MODEL);
        assert_eq!(provider.base_url, DEFAULT_URL);
    }
}
