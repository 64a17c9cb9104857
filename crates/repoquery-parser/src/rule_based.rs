//! Keyword-scoring parser.

use async_trait::async_trait;
use repoquery_core::{ParsedQuery, QueryIntent};
use tracing::debug;

use crate::QueryParser;
use crate::extract::{
    count_technical_terms, extract_comparison_subjects, extract_filters, extract_language,
    extract_limit, extract_project_type, has_comparison_phrase,
};
use crate::vocabulary::{
    COMPARISON_KEYWORDS, RANKING_KEYWORDS, SEARCH_KEYWORDS, TRENDING_KEYWORDS,
};

/// Default time window attached to trending questions, in days.
pub const TRENDING_DEFAULT_DAYS: u32 = 30;

/// Confidence for a query that matched no keyword at all.
const NO_SIGNAL_CONFIDENCE: f64 = 0.3;
/// Bonus per distinct technical term in a search query.
const TECHNICAL_TERM_BONUS: f64 = 0.05;
/// Upper bound on the total technical-term bonus.
const MAX_TECHNICAL_BONUS: f64 = 0.1;

/// Per-intent keyword scores for a single query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentScores {
    /// Ranking keywords, plus one when the query contains a number.
    pub ranking: usize,
    /// Comparison keywords plus phrase and subject boosts.
    pub comparison: usize,
    /// Trending keywords.
    pub trending: usize,
    /// Search keywords.
    pub search: usize,
}

impl IntentScores {
    /// Highest score across all intents.
    #[must_use]
    pub fn max(&self) -> usize {
        self.ranking
            .max(self.comparison)
            .max(self.trending)
            .max(self.search)
    }

    /// Picks the winning intent. Ties resolve comparison, ranking, trending, search.
    #[must_use]
    pub fn resolve(&self) -> QueryIntent {
        let max = self.max();
        if max == 0 {
            QueryIntent::Search
        } else if self.comparison == max {
            QueryIntent::Comparison
        } else if self.ranking == max {
            QueryIntent::Ranking
        } else if self.trending == max {
            QueryIntent::Trending
        } else {
            QueryIntent::Search
        }
    }

    /// Base confidence for the resolved intent, before entity bonuses.
    #[must_use]
    pub fn base_confidence(&self, intent: QueryIntent) -> f64 {
        let step = |score: usize| score as f64 * 0.1;
        match intent {
            QueryIntent::Comparison => (0.6 + step(self.comparison)).min(0.9),
            QueryIntent::Ranking => (0.6 + step(self.ranking)).min(0.9),
            QueryIntent::Trending => (0.5 + step(self.trending)).min(0.8),
            QueryIntent::Search if self.max() == 0 => NO_SIGNAL_CONFIDENCE,
            QueryIntent::Search => (0.4 + step(self.search)).min(0.7),
            QueryIntent::Unknown => 0.0,
        }
    }
}

/// Splits lower-cased text into words with surrounding punctuation removed.
fn words(lowered: &str) -> Vec<&str> {
    lowered
        .split_whitespace()
        .map(|word| word.trim_matches(|character: char| !character.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .collect()
}

fn count_keywords(words: &[&str], keywords: &[&str]) -> usize {
    keywords.iter().filter(|keyword| words.contains(keyword)).count()
}

/// Deterministic parser built on fixed keyword vocabularies.
///
/// Parsing is pure: the same text always yields the same [`ParsedQuery`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedParser;

impl RuleBasedParser {
    /// Create a new parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Scores every intent for the given text.
    #[must_use]
    pub fn score(&self, query: &str) -> IntentScores {
        let lowered = query.to_lowercase();
        let words = words(&lowered);
        let mut scores = IntentScores {
            ranking: count_keywords(&words, RANKING_KEYWORDS),
            comparison: count_keywords(&words, COMPARISON_KEYWORDS),
            trending: count_keywords(&words, TRENDING_KEYWORDS),
            search: count_keywords(&words, SEARCH_KEYWORDS),
        };
        if extract_limit(&lowered).is_some() {
            scores.ranking += 1;
        }
        if has_comparison_phrase(&lowered) {
            scores.comparison += 2;
        }
        if extract_comparison_subjects(&lowered).is_some() {
            scores.comparison += 1;
        }
        scores
    }

    /// Parses free text into a structured query. Never fails.
    #[must_use]
    pub fn parse_text(&self, query: &str) -> ParsedQuery {
        let lowered = query.to_lowercase();
        let mut parsed = ParsedQuery::new(query);
        let scores = self.score(query);

        if let Some(limit) = extract_limit(&lowered) {
            parsed.limit = limit;
        }
        if let Some(subjects) = extract_comparison_subjects(&lowered) {
            parsed.repositories = subjects.to_vec();
        }

        parsed.intent = scores.resolve();
        let mut confidence = scores.base_confidence(parsed.intent);
        if parsed.intent == QueryIntent::Trending {
            parsed.filters.days = Some(TRENDING_DEFAULT_DAYS);
        }
        if parsed.intent == QueryIntent::Search {
            let terms = count_technical_terms(words(&lowered));
            confidence += (terms as f64 * TECHNICAL_TERM_BONUS).min(MAX_TECHNICAL_BONUS);
        }

        parsed.language = extract_language(&lowered);
        if parsed.language.is_some() {
            confidence += if parsed.intent == QueryIntent::Search { 0.2 } else { 0.1 };
        }
        parsed.project_type = extract_project_type(&lowered);
        if parsed.project_type.is_some() {
            confidence += 0.1;
        }

        parsed.filters.merge(&extract_filters(&lowered));
        parsed.confidence = confidence.clamp(0.0, 1.0);

        debug!(
            intent = %parsed.intent,
            confidence = parsed.confidence,
            language = parsed.language.as_deref().unwrap_or("-"),
            "Parsed query"
        );
        parsed
    }
}

#[async_trait]
impl QueryParser for RuleBasedParser {
    fn name(&self) -> &'static str {
        "rule-based"
    }

    async fn parse(&self, query: &str) -> ParsedQuery {
        self.parse_text(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repoquery_core::ProjectType;

    #[test]
    fn test_scores_count_each_keyword_once() {
        let scores = RuleBasedParser::new().score("top top best projects");
        assert_eq!(scores.ranking, 2);
        assert_eq!(scores.search, 1);
    }

    #[test]
    fn test_numbers_boost_ranking() {
        let scores = RuleBasedParser::new().score("5 rust crates");
        assert_eq!(scores.ranking, 1);
    }

    #[test]
    fn test_comparison_wins_ties() {
        let scores = IntentScores {
            ranking: 2,
            comparison: 2,
            trending: 2,
            search: 2,
        };
        assert_eq!(scores.resolve(), QueryIntent::Comparison);

        let scores = IntentScores {
            ranking: 1,
            trending: 1,
            ..IntentScores::default()
        };
        assert_eq!(scores.resolve(), QueryIntent::Ranking);
    }

    #[test]
    fn test_no_signal_is_low_confidence_search() {
        let scores = IntentScores::default();
        assert_eq!(scores.resolve(), QueryIntent::Search);
        assert!((scores.base_confidence(QueryIntent::Search) - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_base_confidence_ceilings() {
        let scores = IntentScores {
            ranking: 9,
            comparison: 9,
            trending: 9,
            search: 9,
        };
        assert!((scores.base_confidence(QueryIntent::Ranking) - 0.9).abs() < 1e-9);
        assert!((scores.base_confidence(QueryIntent::Comparison) - 0.9).abs() < 1e-9);
        assert!((scores.base_confidence(QueryIntent::Trending) - 0.8).abs() < 1e-9);
        assert!((scores.base_confidence(QueryIntent::Search) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_words_strip_punctuation() {
        assert_eq!(words("compare react, vue.js!"), vec!["compare", "react", "vue.js"]);
    }

    #[test]
    fn test_parse_ranking_query() {
        let parsed = RuleBasedParser::new().parse_text("top 10 most starred Python web frameworks");
        assert_eq!(parsed.intent, QueryIntent::Ranking);
        assert_eq!(parsed.limit, 10);
        assert_eq!(parsed.language.as_deref(), Some("python"));
        assert_eq!(parsed.project_type, Some(ProjectType::Framework));
        assert!((parsed.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_trending_sets_default_window_before_filters() {
        let parser = RuleBasedParser::new();
        assert_eq!(parser.parse_text("trending rust tools").filters.days, Some(30));
        assert_eq!(
            parser.parse_text("trending Python projects this week").filters.days,
            Some(7)
        );
    }

    #[test]
    fn test_search_language_bonus_is_larger() {
        let parser = RuleBasedParser::new();
        let plain = parser.parse_text("find parsers");
        let with_language = parser.parse_text("find rust parsers");
        assert_eq!(with_language.intent, QueryIntent::Search);
        assert!((with_language.confidence - plain.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_technical_terms_raise_search_confidence() {
        let parser = RuleBasedParser::new();
        let plain = parser.parse_text("find things");
        let technical = parser.parse_text("find docker kubernetes redis things");
        assert!((technical.confidence - plain.confidence - 0.1).abs() < 1e-9);
    }
}
