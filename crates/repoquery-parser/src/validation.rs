//! Deciding whether a parsed query can be executed, and what to ask otherwise.

use repoquery_core::{ParsedQuery, QueryIntent};

/// Asked when a query fails validation.
pub const SUGGEST_MORE_SPECIFIC: &str = "Could you be more specific about what you're looking for?";
/// Asked for rankings without a language.
pub const SUGGEST_LANGUAGE: &str = "Which programming language are you interested in?";
/// Asked for comparisons with fewer than two subjects.
pub const SUGGEST_REPOSITORIES: &str = "Which repositories would you like to compare?";
/// Asked when confidence is low.
pub const SUGGEST_REPHRASE: &str =
    "I'm not sure I understood correctly. Could you rephrase your question?";

/// Rankings and trending queries above this confidence need no other context.
const CONTEXT_FREE_CONFIDENCE: f64 = 0.6;
/// Below this confidence the user is asked to rephrase.
const REPHRASE_BELOW: f64 = 0.5;

/// Returns true when the query carries enough information to be dispatched.
#[must_use]
pub fn validate(parsed: &ParsedQuery) -> bool {
    match parsed.intent {
        QueryIntent::Unknown => false,
        QueryIntent::Comparison => !parsed.repositories.is_empty(),
        QueryIntent::Ranking | QueryIntent::Trending => {
            parsed.language.is_some()
                || parsed.project_type.is_some()
                || parsed.confidence > CONTEXT_FREE_CONFIDENCE
        }
        QueryIntent::Search => true,
    }
}

/// Clarifying questions for an ambiguous query, in a fixed order.
#[must_use]
pub fn suggest(parsed: &ParsedQuery) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !validate(parsed) {
        suggestions.push(SUGGEST_MORE_SPECIFIC.to_owned());
    }
    if parsed.intent == QueryIntent::Ranking && parsed.language.is_none() {
        suggestions.push(SUGGEST_LANGUAGE.to_owned());
    }
    if parsed.intent == QueryIntent::Comparison && parsed.repositories.len() < 2 {
        suggestions.push(SUGGEST_REPOSITORIES.to_owned());
    }
    if parsed.confidence < REPHRASE_BELOW {
        suggestions.push(SUGGEST_REPHRASE.to_owned());
    }

    suggestions
}
