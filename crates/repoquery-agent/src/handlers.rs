//! Turning a parsed query into repository-provider calls.

use repoquery_core::{
    ComparisonEntry, ParsedQuery, QueryIntent, Repository, RepositoryProvider, Result,
    SearchRequest, SortKey, SortOrder,
};
use serde::Serialize;
use tracing::{debug, warn};

/// Trending window when the question names none, in days.
const TRENDING_DAYS: u32 = 30;
/// Trending star floor when the question names none.
const TRENDING_MIN_STARS: u64 = 10;
/// Page size for free searches.
const SEARCH_PAGE_SIZE: u32 = 20;
/// Most terms taken from the question for a search.
const MAX_SEARCH_TERMS: usize = 3;
/// Query used for rankings that carry no terms at all.
const UNFILTERED_RANKING: &str = "stars:>100";

/// Domain words worth forwarding to a ranking search.
const DOMAIN_TERMS: &[&str] = &[
    "trading", "finance", "financial", "option", "options", "covered", "calls", "machine",
    "learning", "neural", "network", "deep", "ai", "artificial", "web", "http", "rest", "api",
    "microservice", "microservices", "database", "sql", "nosql", "orm", "cache", "redis",
    "testing", "test", "unit", "integration", "mock", "auth", "authentication", "security",
    "crypto", "encryption", "docker", "kubernetes", "cloud", "aws", "gcp", "azure",
];

/// Words that carry no search signal.
const STOP_WORDS: &[&str] = &[
    "find", "show", "me", "some", "any", "projects", "repositories", "repos", "about", "for",
    "with", "that", "are", "is", "am", "looking", "search", "get", "help", "i", "im", "want",
    "need", "decent", "good", "nice", "best", "top", "popular", "which", "what", "how", "where",
    "arent", "too", "very", "really", "quite", "pretty", "heavyweight", "light", "heavy",
    "small", "large", "simple", "complex",
];

/// Technical words searched first.
const TECH_KEYWORDS: &[&str] = &[
    "framework", "frameworks", "library", "libraries", "tool", "tools", "microservice",
    "microservices", "api", "rest", "web", "http", "database", "db", "orm", "sql", "nosql",
    "cache", "redis", "testing", "auth", "authentication", "security", "crypto", "machine",
    "learning", "ml", "ai", "neural", "deep", "docker", "kubernetes", "cloud", "aws", "gcp",
    "azure",
];

/// Languages a bare comparison subject may name.
const COMPARABLE_LANGUAGES: &[&str] = &[
    "java", "python", "javascript", "go", "rust", "c++", "c#", "php", "ruby", "swift", "kotlin",
];

/// Result of executing a parsed query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisData {
    /// Ranked, trending or searched repositories
    Repositories(Vec<Repository>),
    /// Side-by-side comparison
    Comparison(Vec<ComparisonEntry>),
}

impl AnalysisData {
    /// Number of repositories found.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Repositories(repositories) => repositories.len(),
            Self::Comparison(entries) => entries.len(),
        }
    }

    /// Whether nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lower-cased words with apostrophes removed and edge punctuation stripped.
fn query_words(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .replace('\'', "")
        .split_whitespace()
        .map(|word| word.trim_matches(|character: char| matches!(character, '.' | ',' | '!' | '?')))
        .filter(|word| !word.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Search for the most starred repositories matching the question.
#[must_use]
pub fn ranking_request(parsed: &ParsedQuery) -> SearchRequest {
    let mut terms: Vec<String> = Vec::new();
    if let Some(project_type) = parsed.project_type {
        terms.push(project_type.as_str().to_owned());
    }
    if let Some(language) = &parsed.language {
        terms.push(language.clone());
    }

    let domain_terms: Vec<String> = if parsed.domain_keywords.is_empty() {
        query_words(&parsed.original_query)
            .into_iter()
            .filter(|word| DOMAIN_TERMS.contains(&word.as_str()))
            .collect()
    } else {
        parsed.domain_keywords.clone()
    };
    terms.extend(domain_terms.into_iter().take(MAX_SEARCH_TERMS));

    let query = if terms.is_empty() {
        UNFILTERED_RANKING.to_owned()
    } else {
        terms.join(" ")
    };

    SearchRequest::new(query)
        .with_language(parsed.language.clone())
        .sorted_by(parsed.sort_by)
        .with_order(SortOrder::Desc)
        .with_per_page(parsed.limit)
}

/// Free search built from the meaningful words of the question.
#[must_use]
pub fn search_request(parsed: &ParsedQuery) -> SearchRequest {
    let words = query_words(&parsed.original_query);
    let mut meaningful: Vec<&str> = Vec::new();

    for word in &words {
        if TECH_KEYWORDS.contains(&word.as_str()) && !meaningful.contains(&word.as_str()) {
            meaningful.push(word);
        }
    }
    for word in &words {
        if !STOP_WORDS.contains(&word.as_str())
            && word.chars().count() > 2
            && !meaningful.contains(&word.as_str())
        {
            meaningful.push(word);
        }
    }

    let query = if !meaningful.is_empty() {
        meaningful
            .into_iter()
            .take(MAX_SEARCH_TERMS)
            .collect::<Vec<_>>()
            .join(" ")
    } else if let Some(project_type) = parsed.project_type {
        project_type.as_str().to_owned()
    } else if let Some(language) = &parsed.language {
        format!("{language} framework")
    } else {
        "popular projects".to_owned()
    };

    SearchRequest::new(query)
        .with_language(parsed.language.clone())
        .sorted_by(SortKey::Stars)
        .with_order(SortOrder::Desc)
        .with_per_page(SEARCH_PAGE_SIZE)
}

/// Resolves one comparison subject to an `(owner, name)` pair.
async fn resolve_subject(
    repositories: &dyn RepositoryProvider,
    subject: &str,
) -> Result<Option<(String, String)>> {
    if let Some((owner, name)) = subject.split_once('/') {
        return Ok(Some((owner.to_owned(), name.to_owned())));
    }

    let lowered = subject.to_lowercase();
    let request = if COMPARABLE_LANGUAGES.contains(&lowered.as_str()) {
        SearchRequest::new("").with_language(Some(lowered))
    } else {
        SearchRequest::new(subject)
    }
    .with_per_page(1);

    let resolved = repositories
        .search(&request)
        .await?
        .first()
        .and_then(Repository::owner_and_name);
    debug!("Resolved comparison subject {subject} to {resolved:?}");
    Ok(resolved)
}

/// Executes the provider calls for a parsed query.
///
/// # Errors
///
/// Propagates repository-provider errors.
pub async fn execute(
    repositories: &dyn RepositoryProvider,
    parsed: &ParsedQuery,
) -> Result<AnalysisData> {
    match parsed.intent {
        QueryIntent::Ranking => Ok(AnalysisData::Repositories(
            repositories.search(&ranking_request(parsed)).await?,
        )),
        QueryIntent::Comparison => {
            let mut pairs = Vec::with_capacity(parsed.repositories.len());
            for subject in &parsed.repositories {
                match resolve_subject(repositories, subject).await? {
                    Some(pair) => pairs.push(pair),
                    None => warn!("No repository found for comparison subject: {subject}"),
                }
            }
            if pairs.is_empty() {
                return Ok(AnalysisData::Comparison(Vec::new()));
            }
            Ok(AnalysisData::Comparison(repositories.compare(&pairs).await?))
        }
        QueryIntent::Trending => {
            let days = parsed.filters.days.unwrap_or(TRENDING_DAYS);
            let min_stars = parsed.filters.min_stars.unwrap_or(TRENDING_MIN_STARS);
            Ok(AnalysisData::Repositories(
                repositories
                    .trending(parsed.language.as_deref(), days, min_stars)
                    .await?,
            ))
        }
        QueryIntent::Search => Ok(AnalysisData::Repositories(
            repositories.search(&search_request(parsed)).await?,
        )),
        QueryIntent::Unknown => Ok(AnalysisData::Repositories(Vec::new())),
    }
}
