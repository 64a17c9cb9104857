//! Provider seams for text generation and repository data.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::{
    ComparisonEntry, Completion, Prompt, Repository, RepositoryDetails, Result, SearchRequest,
    SortKey,
};

/// Page size used for trending searches.
const TRENDING_PAGE_SIZE: u32 = 20;

/// Trait for text-generation services (chat models, local models, mocks).
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Returns the unique identifier for this provider.
    fn name(&self) -> &'static str;

    /// Checks whether this provider is currently available and ready to process requests.
    async fn is_available(&self) -> bool;

    /// Generates text for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unavailable, the request fails,
    /// or the response cannot be parsed.
    async fn generate(&self, prompt: &Prompt) -> Result<Completion>;
}

/// Source of repository metadata.
///
/// Implementations own their caching, retry and rate-limit handling.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    /// Runs a repository search.
    ///
    /// # Errors
    ///
    /// Returns an error if the search cannot be answered.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Repository>>;

    /// Fetches one repository with recent activity statistics.
    ///
    /// Returns `Ok(None)` when the repository cannot be found.
    ///
    /// # Errors
    ///
    /// Returns an error for failures other than a missing repository.
    async fn details(&self, owner: &str, name: &str) -> Result<Option<RepositoryDetails>>;

    /// Finds recently pushed repositories above a star threshold.
    ///
    /// # Errors
    ///
    /// Propagates search errors.
    async fn trending(
        &self,
        language: Option<&str>,
        days: u32,
        min_stars: u64,
    ) -> Result<Vec<Repository>> {
        let since = days_ago(days);
        let request = SearchRequest::new(trending_query(min_stars, since))
            .with_language(language.map(str::to_owned))
            .sorted_by(SortKey::Updated)
            .with_per_page(TRENDING_PAGE_SIZE);
        self.search(&request).await
    }

    /// Fetches every `(owner, name)` pair and flattens it for side-by-side display.
    ///
    /// Pairs that cannot be found are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Propagates detail-fetch errors.
    async fn compare(&self, repositories: &[(String, String)]) -> Result<Vec<ComparisonEntry>> {
        let mut entries = Vec::with_capacity(repositories.len());
        for (owner, name) in repositories {
            match self.details(owner, name).await? {
                Some(details) => entries.push(ComparisonEntry::from(details)),
                None => tracing::warn!("Could not fetch data for repository: {owner}/{name}"),
            }
        }
        Ok(entries)
    }
}

/// Calendar date `days` before today, clamped to the earliest representable date.
pub fn days_ago(days: u32) -> NaiveDate {
    Utc::now()
        .checked_sub_signed(TimeDelta::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
        .date_naive()
}

/// GitHub search qualifiers selecting repositories pushed since `since` with
/// more than `min_stars` stars.
pub fn trending_query(min_stars: u64, since: NaiveDate) -> String {
    format!("stars:>{min_stars} pushed:>{}", since.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trending_query_format() {
        let since = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(trending_query(10, since), "stars:>10 pushed:>2024-03-09");
    }

    #[test]
    fn test_days_ago_is_in_the_past() {
        let today = Utc::now().date_naive();
        assert!(days_ago(7) < today);
        assert!(days_ago(0) >= today);
    }
}
