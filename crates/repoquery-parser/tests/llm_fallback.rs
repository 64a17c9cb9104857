//! Provider-backed parsing and its silent fallback to the rule-based parser
#![cfg_attr(
    test,
    allow(
        clippy::missing_panics_doc,
        clippy::tests_outside_test_module,
        reason = "Test allows"
    )
)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use repoquery_core::{Completion, ModelProvider, ProjectType, Prompt, QueryIntent, Result};
use repoquery_parser::{LlmQueryParser, QueryParser, RuleBasedParser};
use repoquery_providers::MockProvider;

/// Provider that never answers within any reasonable budget.
struct StalledProvider;

#[async_trait]
impl ModelProvider for StalledProvider {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, _prompt: &Prompt) -> Result<Completion> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Completion {
            text: "{}".to_owned(),
            provider: "stalled".to_owned(),
            latency_ms: 60_000,
            tokens_used: repoquery_core::TokenUsage::default(),
        })
    }
}

const MODEL_ANSWER: &str = r#"Here you go:
```json
{
  "intent": "ranking",
  "language": "JS",
  "project_type": "frameworks",
  "sort_by": "stars",
  "limit": 7,
  "repositories": [],
  "filters": {"days": 30},
  "domain_keywords": ["web", "ui", "spa", "ssr"],
  "confidence": 0.92
}
```"#;

#[tokio::test]
async fn provider_answer_is_normalized() {
    let provider = MockProvider::new("mock").with_response("frontend", MODEL_ANSWER);
    let parser = LlmQueryParser::new(Arc::new(provider.clone()));

    let parsed = parser.parse("seven best frontend frameworks").await;

    assert_eq!(parsed.intent, QueryIntent::Ranking);
    assert_eq!(parsed.language.as_deref(), Some("javascript"));
    assert_eq!(parsed.project_type, Some(ProjectType::Framework));
    assert_eq!(parsed.limit, 7);
    assert_eq!(parsed.filters.days, Some(30));
    assert_eq!(parsed.domain_keywords, vec!["web", "ui", "spa"]);
    assert!((parsed.confidence - 0.92).abs() < 1e-9);
    assert_eq!(parsed.original_query, "seven best frontend frameworks");
    assert_eq!(provider.call_count(), 1);
    assert!(provider.get_call_history()[0].contains("seven best frontend frameworks"));
}

#[tokio::test]
async fn provider_failure_falls_back_silently() {
    let provider = MockProvider::new("mock").failing("connection refused");
    let parser = LlmQueryParser::new(Arc::new(provider));
    let query = "top 10 most starred Python web frameworks";

    let parsed = parser.parse(query).await;

    assert_eq!(parsed, RuleBasedParser::new().parse_text(query));
    assert!(parsed.domain_keywords.is_empty());
}

#[tokio::test]
async fn malformed_output_falls_back() {
    for answer in [
        "I cannot help with that",
        "{\"intent\": ",
        "{\"intent\": \"celebrate\"}",
        "{\"intent\": \"search\", \"limit\": \"many\"}",
    ] {
        let provider = MockProvider::new("mock").with_default_response(answer);
        let parser = LlmQueryParser::new(Arc::new(provider));
        let query = "compare React vs Vue";

        let parsed = parser.parse(query).await;

        assert_eq!(parsed, RuleBasedParser::new().parse_text(query), "{answer}");
    }
}

#[tokio::test]
async fn slow_provider_times_out_to_fallback() {
    let parser =
        LlmQueryParser::new(Arc::new(StalledProvider)).with_timeout(Duration::from_millis(50));
    let query = "trending Python projects this week";

    let parsed = parser.parse(query).await;

    assert_eq!(parsed, RuleBasedParser::new().parse_text(query));
}

#[tokio::test]
async fn validation_is_shared_with_rule_based_parser() {
    let provider = MockProvider::new("mock")
        .with_default_response(r#"{"intent": "comparison", "repositories": [], "confidence": 0.9}"#);
    let parser = LlmQueryParser::new(Arc::new(provider));

    let parsed = parser.parse("compare things").await;

    assert_eq!(parsed.intent, QueryIntent::Comparison);
    assert!(!parser.validate(&parsed));
    assert!(
        parser
            .suggest(&parsed)
            .iter()
            .any(|suggestion| suggestion.contains("repositories"))
    );
    assert_eq!(parser.name(), "llm");
}
