//! The question-answering loop: parse, validate, fetch, render, remember.

use std::sync::Arc;
use std::time::Instant;

use repoquery_core::{QueryIntent, RepositoryProvider};
use repoquery_parser::QueryParser;
use serde::Serialize;
use tracing::{error, info};

use crate::context::{ConversationContext, HistoryEntry};
use crate::handlers::{self, AnalysisData};
use crate::render::ResponseGenerator;

/// Prefix of the answer given to a query that failed validation.
const NEED_MORE_INFORMATION: &str = "I need more information to help you. ";

/// Facts about how a reply was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyMetadata {
    /// Language the query was scoped to
    pub language: Option<String>,
    /// Number of repositories in the data
    pub repositories_found: usize,
    /// Wall-clock time spent answering
    pub processing_time_ms: u64,
}

/// Outcome of one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentReply {
    /// Text shown to the user
    pub response: String,
    /// Whether the question was answered
    pub success: bool,
    /// Intent the question was parsed as, absent when processing failed
    pub intent: Option<QueryIntent>,
    /// Parser confidence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Clarifying questions for an incomplete query
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    /// Repositories behind the answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisData>,
    /// Timing and counts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ReplyMetadata>,
    /// Error message when processing failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentReply {
    fn clarification(intent: QueryIntent, confidence: f64, suggestions: Vec<String>) -> Self {
        Self {
            response: format!("{NEED_MORE_INFORMATION}{}", suggestions.join(" ")),
            success: false,
            intent: Some(intent),
            confidence: Some(confidence),
            suggestions,
            data: None,
            metadata: None,
            error: None,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            response: format!("I encountered an error while processing your query: {message}"),
            success: false,
            intent: None,
            confidence: None,
            suggestions: Vec::new(),
            data: None,
            metadata: None,
            error: Some(message),
        }
    }
}

/// Answers repository questions one at a time, remembering what was asked.
pub struct Agent {
    parser: Arc<dyn QueryParser>,
    repositories: Arc<dyn RepositoryProvider>,
    responder: ResponseGenerator,
    context: ConversationContext,
}

impl Agent {
    /// Creates an agent with template responses.
    pub fn new(parser: Arc<dyn QueryParser>, repositories: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            parser,
            repositories,
            responder: ResponseGenerator::templates_only(),
            context: ConversationContext::default(),
        }
    }

    /// Replaces the response generator.
    #[must_use]
    pub fn with_responder(mut self, responder: ResponseGenerator) -> Self {
        self.responder = responder;
        self
    }

    /// Answers one question. Failures are reported in the reply, never returned.
    pub async fn process(&mut self, query: &str) -> AgentReply {
        let started = Instant::now();
        info!("Processing query: {query}");

        let parsed = self.parser.parse(query).await;
        if !self.parser.validate(&parsed) {
            let suggestions = self.parser.suggest(&parsed);
            info!(intent = %parsed.intent, "Query needs clarification");
            return AgentReply::clarification(parsed.intent, parsed.confidence, suggestions);
        }

        self.context.remember(&parsed);

        let data = match handlers::execute(self.repositories.as_ref(), &parsed).await {
            Ok(data) => data,
            Err(err) => {
                error!("Error processing query: {err}");
                return AgentReply::failure(err.to_string());
            }
        };

        let response = self.responder.generate(&parsed, &data).await;
        self.context.record(query, &response, parsed.intent);

        let processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AgentReply {
            response,
            success: true,
            intent: Some(parsed.intent),
            confidence: Some(parsed.confidence),
            suggestions: Vec::new(),
            metadata: Some(ReplyMetadata {
                language: parsed.language.clone(),
                repositories_found: data.len(),
                processing_time_ms,
            }),
            data: Some(data),
            error: None,
        }
    }

    /// Answered questions, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.context.history
    }

    /// Current conversation memory.
    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    /// Forgets the history and the last query.
    pub fn clear_history(&mut self) {
        self.context.clear();
        info!("Conversation history cleared");
    }
}
