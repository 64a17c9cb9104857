//! Natural-language query understanding for repository questions.
//!
//! [`RuleBasedParser`] scores fixed keyword vocabularies to classify a question
//! and extract its slots. [`LlmQueryParser`] asks a text-generation provider for
//! the same structure and falls back to the rule-based result on any failure.

/// Slot extraction helpers
pub mod extract;
/// Parser that delegates to a text-generation provider
pub mod llm;
/// Keyword-scoring parser
pub mod rule_based;
/// Validation and clarification
pub mod validation;
/// Fixed keyword and entity vocabularies
pub mod vocabulary;

use async_trait::async_trait;
use repoquery_core::ParsedQuery;

pub use llm::LlmQueryParser;
pub use rule_based::{IntentScores, RuleBasedParser};
pub use validation::{suggest, validate};
pub use vocabulary::canonical_language;

/// Strategy for turning free text into a [`ParsedQuery`].
#[async_trait]
pub trait QueryParser: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Parse a question. Never fails; unusable input yields a low-confidence result.
    async fn parse(&self, query: &str) -> ParsedQuery;

    /// Whether the parsed query can be executed as-is
    fn validate(&self, parsed: &ParsedQuery) -> bool {
        validation::validate(parsed)
    }

    /// Clarifying questions for a query that is ambiguous or incomplete
    fn suggest(&self, parsed: &ParsedQuery) -> Vec<String> {
        validation::suggest(parsed)
    }
}
