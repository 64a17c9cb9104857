//! Prompts sent to text-generation providers and their completions.

use serde::{Deserialize, Serialize};

/// Default sampling temperature for generated text.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default completion budget in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Request sent to a text-generation provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// System instructions
    pub system: String,
    /// User message
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion budget in tokens
    pub max_tokens: u32,
}

impl Prompt {
    /// Creates a prompt with default sampling parameters.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the completion budget.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Text returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Generated text
    pub text: String,
    /// `provider/model` that produced the text
    pub provider: String,
    /// Wall-clock latency
    pub latency_ms: u64,
    /// Token accounting
    pub tokens_used: TokenUsage,
}

/// Token accounting for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub input: u64,
    /// Completion tokens
    pub output: u64,
}

impl TokenUsage {
    /// Prompt plus completion tokens.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}
