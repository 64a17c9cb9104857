//! Natural-language answers, from a model when one is usable, otherwise from templates.

use std::sync::Arc;

use repoquery_core::{Error, ModelProvider, ParsedQuery, Prompt, Result};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::handlers::AnalysisData;
use crate::templates;

/// Characters of JSON-encoded results embedded in a model prompt.
const DATA_EXCERPT_CHARS: usize = 1000;

const SYSTEM_PROMPT: &str = "You are a helpful GitHub repository analysis expert. Provide clear, \
informative responses about repositories, programming trends, and code analysis.";

/// Builds the user prompt describing the question and its results.
#[must_use]
pub fn response_prompt(parsed: &ParsedQuery, data: &AnalysisData) -> String {
    let encoded = serde_json::to_string(data).unwrap_or_default();
    let excerpt: String = encoded.chars().take(DATA_EXCERPT_CHARS).collect();
    format!(
        "You are a GitHub repository analysis expert. A user asked: \"{query}\"\n\n\
         The query intent is: {intent}\n\
         Programming language: {language}\n\n\
         Analysis results: {excerpt}\n\n\
         Provide a clear, informative response that:\n\
         1. Directly answers the user's question\n\
         2. Highlights the most important findings\n\
         3. Uses markdown formatting for readability\n\
         4. Includes specific metrics (stars, forks, activity)\n\
         5. Keeps response under 500 words\n\n\
         Response:\n",
        query = parsed.original_query,
        intent = parsed.intent,
        language = parsed.language.as_deref().unwrap_or("Not specified"),
    )
}

/// Picks where an answer's text comes from.
///
/// OpenAI is used only in complete mode. Otherwise a local Ollama model is
/// used when it passes its availability check, and templates cover every
/// other case, including any provider failure.
pub struct ResponseGenerator {
    openai: Option<Arc<dyn ModelProvider>>,
    ollama: Option<Arc<dyn ModelProvider>>,
    complete_mode: bool,
    ollama_available: OnceCell<bool>,
}

impl ResponseGenerator {
    /// Template-only generator.
    #[must_use]
    pub fn templates_only() -> Self {
        Self {
            openai: None,
            ollama: None,
            complete_mode: false,
            ollama_available: OnceCell::new(),
        }
    }

    /// Adds an OpenAI-style provider and whether complete mode is on.
    #[must_use]
    pub fn with_openai(mut self, provider: Arc<dyn ModelProvider>, complete_mode: bool) -> Self {
        self.openai = Some(provider);
        self.complete_mode = complete_mode;
        self
    }

    /// Adds a local model provider, checked once on first use.
    #[must_use]
    pub fn with_ollama(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.ollama = Some(provider);
        self
    }

    /// Provider that would answer next, if any.
    async fn select(&self) -> Option<&Arc<dyn ModelProvider>> {
        if self.complete_mode
            && let Some(openai) = &self.openai
        {
            return Some(openai);
        }

        let ollama = self.ollama.as_ref()?;
        let available = *self
            .ollama_available
            .get_or_init(|| async move {
                let available = ollama.is_available().await;
                if available {
                    info!("Ollama provider available for responses");
                } else {
                    info!("Ollama not available, using template responses");
                }
                available
            })
            .await;
        available.then_some(ollama)
    }

    async fn generate_with(
        provider: &dyn ModelProvider,
        parsed: &ParsedQuery,
        data: &AnalysisData,
    ) -> Result<String> {
        let prompt = Prompt::new(SYSTEM_PROMPT, response_prompt(parsed, data));
        let completion = provider.generate(&prompt).await?;
        let text = completion.text.trim();
        if text.is_empty() {
            return Err(Error::InvalidResponse(
                "empty response text".to_owned(),
            ));
        }
        info!(provider = %completion.provider, latency_ms = completion.latency_ms, "Generated response");
        Ok(text.to_owned())
    }

    /// Renders the answer for a handled query.
    pub async fn generate(&self, parsed: &ParsedQuery, data: &AnalysisData) -> String {
        let Some(provider) = self.select().await else {
            return templates::render(parsed, data);
        };
        match Self::generate_with(provider.as_ref(), parsed, data).await {
            Ok(text) => text,
            Err(error) => {
                warn!("{} response generation failed: {error}", provider.name());
                templates::render(parsed, data)
            }
        }
    }
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::templates_only()
    }
}
