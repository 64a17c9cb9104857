//! Mock provider for testing parsing and response generation.
//!
//! Answers prompts with canned text so that agent workflows can be exercised
//! end to end without real API calls.

use async_trait::async_trait;
use repoquery_core::{
    Completion, Error, IgnoreLock as _, ModelProvider, Prompt, Result, TokenUsage,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Response storage type
type ResponseMap = Arc<Mutex<HashMap<String, String>>>;

/// Mock provider that returns pre-defined responses based on prompt patterns.
#[derive(Clone)]
pub struct MockProvider {
    /// Label reported in completions
    name: String,
    /// Predefined responses keyed by user prompt text or substring
    responses: ResponseMap,
    /// Response used when no pattern matches
    default_response: Arc<Mutex<Option<String>>>,
    /// When set, every call fails with this message
    failure: Arc<Mutex<Option<String>>>,
    /// Reported by `is_available`
    available: Arc<Mutex<bool>>,
    /// User prompts received, in order
    call_history: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with a given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            failure: Arc::new(Mutex::new(None)),
            available: Arc::new(Mutex::new(true)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a pattern-based response.
    #[must_use]
    pub fn with_response(self, pattern: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses
            .lock_ignore_poison()
            .insert(pattern.into(), response.into());
        self
    }

    /// Set a default response for prompts that don't match any pattern.
    #[must_use]
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        *self.default_response.lock_ignore_poison() = Some(response.into());
        self
    }

    /// Make every `generate` call fail with a provider error.
    #[must_use]
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.failure.lock_ignore_poison() = Some(message.into());
        self
    }

    /// Control what `is_available` reports.
    #[must_use]
    pub fn with_availability(self, available: bool) -> Self {
        *self.available.lock_ignore_poison() = available;
        self
    }

    /// Clear the call history.
    pub fn clear_history(&self) {
        self.call_history.lock_ignore_poison().clear();
    }

    /// User prompts received so far.
    #[must_use]
    pub fn get_call_history(&self) -> Vec<String> {
        self.call_history.lock_ignore_poison().clone()
    }

    /// Number of `generate` calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_history.lock_ignore_poison().len()
    }

    /// Exact match first, then the first pattern contained in the text.
    fn find_response(&self, text: &str) -> Option<String> {
        let responses = self.responses.lock_ignore_poison();
        if let Some(response) = responses.get(text) {
            return Some(response.clone());
        }

        let mut patterns: Vec<&String> = responses.keys().collect();
        patterns.sort();
        patterns
            .into_iter()
            .find(|pattern| text.contains(pattern.as_str()))
            .and_then(|pattern| responses.get(pattern))
            .cloned()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        *self.available.lock_ignore_poison()
    }

    async fn generate(&self, prompt: &Prompt) -> Result<Completion> {
        self.call_history
            .lock_ignore_poison()
            .push(prompt.user.clone());

        if let Some(message) = self.failure.lock_ignore_poison().clone() {
            return Err(Error::Provider(message));
        }

        let text = self.find_response(&prompt.user).unwrap_or_else(|| {
            self.default_response
                .lock_ignore_poison()
                .clone()
                .unwrap_or_else(|| format!("Mock response for prompt: {}", prompt.user))
        });

        Ok(Completion {
            text,
            provider: self.name.clone(),
            latency_ms: 0,
            tokens_used: TokenUsage {
                input: prompt.user.len() as u64,
                output: 0,
            },
        })
    }
}
