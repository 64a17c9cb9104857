//! Parser that asks a text-generation provider for the structured query.

use async_trait::async_trait;
use repoquery_core::query::{DEFAULT_LIMIT, MAX_LIMIT};
use repoquery_core::{
    Error, Filters, ModelProvider, ParsedQuery, ProjectType, Prompt, QueryIntent, Result, SortKey,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::QueryParser;
use crate::rule_based::RuleBasedParser;
use crate::vocabulary::canonical_language;

/// Default bound on a single provider round trip.
pub const DEFAULT_PARSE_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of comparison subjects kept from the model output.
const MAX_REPOSITORIES: usize = 2;
/// Maximum number of domain keywords kept from the model output.
const MAX_DOMAIN_KEYWORDS: usize = 3;

const SYSTEM_PROMPT: &str = "You convert questions about open-source GitHub repositories into JSON. \
Reply with a single JSON object and nothing else. Fields: \
\"intent\" (one of \"ranking\", \"comparison\", \"trending\", \"search\"), \
\"language\" (lowercase programming language or null), \
\"project_type\" (one of framework, library, tool, package, module, plugin, extension, sdk, api, service, app, application, or null), \
\"sort_by\" (\"stars\", \"forks\" or \"updated\"), \
\"limit\" (integer 1-50), \
\"repositories\" (up to two names or owner/name pairs being compared), \
\"filters\" (object with optional integer keys days, min_stars, max_stars, min_size, max_size), \
\"domain_keywords\" (up to three topic words), \
\"confidence\" (number between 0 and 1).";

/// Shape the provider is asked to produce. Every field is optional so that
/// partially filled answers still parse.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelQuery {
    intent: String,
    language: Option<String>,
    project_type: Option<String>,
    sort_by: Option<String>,
    limit: Option<i64>,
    repositories: Vec<String>,
    filters: Filters,
    domain_keywords: Vec<String>,
    confidence: Option<f64>,
}

/// Delegates parsing to a [`ModelProvider`] and falls back to the
/// [`RuleBasedParser`] whenever the provider cannot produce a usable answer.
pub struct LlmQueryParser {
    /// Provider asked for the structured query
    provider: Arc<dyn ModelProvider>,
    /// Parser used on any provider failure
    fallback: RuleBasedParser,
    /// Bound on one provider round trip
    timeout: Duration,
}

impl LlmQueryParser {
    /// Creates a parser backed by the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            fallback: RuleBasedParser::new(),
            timeout: DEFAULT_PARSE_TIMEOUT,
        }
    }

    /// Sets the bound on a single provider round trip.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Asks the provider and normalizes its answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails, times out or answers with
    /// something that is not a usable query object.
    pub async fn parse_with_provider(&self, query: &str) -> Result<ParsedQuery> {
        let prompt = Prompt::new(SYSTEM_PROMPT, format!("Question: {query}"))
            .with_temperature(0.0)
            .with_max_tokens(300);

        let completion = timeout(self.timeout, self.provider.generate(&prompt))
            .await
            .map_err(|_| Error::Timeout(self.timeout.as_millis() as u64))??;
        debug!(
            provider = %completion.provider,
            latency_ms = completion.latency_ms,
            "Query parsed by provider"
        );

        let json = extract_json_object(&completion.text).ok_or_else(|| {
            Error::InvalidResponse("no JSON object in provider output".to_owned())
        })?;
        let model_query: ModelQuery = serde_json::from_str(json)?;
        normalize(model_query, query)
    }
}

#[async_trait]
impl QueryParser for LlmQueryParser {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn parse(&self, query: &str) -> ParsedQuery {
        match self.parse_with_provider(query).await {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(
                    provider = self.provider.name(),
                    %error,
                    "Provider parse failed, using rule-based parser"
                );
                self.fallback.parse_text(query)
            }
        }
    }
}

/// Slice from the first `{` to the last `}`, which tolerates prose or code
/// fences around the object.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn parse_intent(intent: &str) -> Result<QueryIntent> {
    match intent.trim().to_lowercase().as_str() {
        "ranking" => Ok(QueryIntent::Ranking),
        "comparison" => Ok(QueryIntent::Comparison),
        "trending" => Ok(QueryIntent::Trending),
        "search" => Ok(QueryIntent::Search),
        "unknown" => Ok(QueryIntent::Unknown),
        other => Err(Error::InvalidResponse(format!("unknown intent {other:?}"))),
    }
}

fn parse_sort_key(sort_by: Option<&str>) -> SortKey {
    match sort_by.map(str::to_lowercase).as_deref() {
        Some("forks") => SortKey::Forks,
        Some("updated") => SortKey::Updated,
        _ => SortKey::Stars,
    }
}

fn non_blank(values: Vec<String>, max: usize) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .take(max)
        .collect()
}

fn normalize(model_query: ModelQuery, original_query: &str) -> Result<ParsedQuery> {
    let mut parsed = ParsedQuery::new(original_query);
    parsed.intent = parse_intent(&model_query.intent)?;
    parsed.language = model_query.language.as_deref().and_then(canonical_language);
    parsed.project_type = model_query
        .project_type
        .as_deref()
        .and_then(|noun| ProjectType::from_noun(&noun.trim().to_lowercase()));
    parsed.sort_by = parse_sort_key(model_query.sort_by.as_deref());
    parsed.limit = model_query.limit.map_or(DEFAULT_LIMIT, |limit| {
        limit.clamp(1, i64::from(MAX_LIMIT)) as u32
    });
    parsed.repositories = non_blank(model_query.repositories, MAX_REPOSITORIES);
    parsed.filters = model_query.filters;
    parsed.domain_keywords = non_blank(model_query.domain_keywords, MAX_DOMAIN_KEYWORDS);
    parsed.confidence = model_query
        .confidence
        .filter(|confidence| confidence.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);
    Ok(parsed)
}
