//! Flat conversation memory.

use chrono::{DateTime, Utc};
use repoquery_core::{ParsedQuery, QueryIntent};
use serde::{Deserialize, Serialize};

/// One answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Question as typed
    pub query: String,
    /// Rendered answer
    pub response: String,
    /// When the answer was produced, serialized as RFC 3339
    pub timestamp: DateTime<Utc>,
    /// Intent the question was answered under
    pub intent: QueryIntent,
}

/// What the agent remembers between questions: the last query and a
/// chronological history. There is no dialogue state beyond this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Last question that passed validation
    pub last_query: Option<String>,
    /// Its intent
    pub last_intent: Option<QueryIntent>,
    /// Its language
    pub last_language: Option<String>,
    /// Answered questions, oldest first
    pub history: Vec<HistoryEntry>,
}

impl ConversationContext {
    /// Remembers the most recent valid query.
    pub fn remember(&mut self, parsed: &ParsedQuery) {
        self.last_query = Some(parsed.original_query.clone());
        self.last_intent = Some(parsed.intent);
        self.last_language.clone_from(&parsed.language);
    }

    /// Appends an answered question to the history.
    pub fn record(&mut self, query: &str, response: &str, intent: QueryIntent) {
        self.history.push(HistoryEntry {
            query: query.to_owned(),
            response: response.to_owned(),
            timestamp: Utc::now(),
            intent,
        });
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
