//! Repository records returned by repository-data providers.

use chrono::{DateTime, Utc};
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::query::SortKey;

/// Placeholder used when a repository carries no license.
pub const NO_LICENSE: &str = "No License";

/// Account that owns a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    /// Login name of the owning user or organization
    pub login: String,
}

/// License metadata attached to a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryLicense {
    /// Human-readable license name
    pub name: String,
}

/// Summary record of a repository as returned by search.
///
/// Accepts GitHub's `stargazers_count` on input and serializes it as `stars`.
/// GitHub sends `forks`, `watchers` and `open_issues` alongside their `_count`
/// twins, so only the short names are read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name without owner
    pub name: String,
    /// `owner/name`
    #[serde(default)]
    pub full_name: String,
    /// Owning account
    #[serde(default)]
    pub owner: RepositoryOwner,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Stargazer count
    #[serde(default, alias = "stargazers_count")]
    pub stars: u64,
    /// Fork count
    #[serde(default)]
    pub forks: u64,
    /// Watcher count
    #[serde(default)]
    pub watchers: u64,
    /// Open issue count
    #[serde(default)]
    pub open_issues: u64,
    /// Repository size in kilobytes
    #[serde(default)]
    pub size: u64,
    /// Primary language reported by GitHub
    #[serde(default)]
    pub language: Option<String>,
    /// Web URL
    #[serde(default)]
    pub html_url: String,
    /// License, when declared
    #[serde(default)]
    pub license: Option<RepositoryLicense>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last metadata update
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Last push
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

impl Repository {
    /// Returns `owner/name`, deriving it when the provider left `full_name` empty.
    pub fn display_name(&self) -> String {
        if !self.full_name.is_empty() {
            return self.full_name.clone();
        }
        if self.owner.login.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.owner.login, self.name)
        }
    }

    /// Splits the full name into `(owner, name)`.
    pub fn owner_and_name(&self) -> Option<(String, String)> {
        self.display_name()
            .split_once('/')
            .map(|(owner, name)| (owner.to_owned(), name.to_owned()))
    }
}

/// Activity statistics over a recent window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStats {
    /// Commits in the window
    pub recent_commits: u64,
    /// Issues (not pull requests) opened or updated in the window
    pub recent_issues: u64,
    /// Pull requests opened or updated in the window
    pub recent_prs: u64,
    /// Contributors listed on the first page
    pub contributors_count: u64,
}

/// Repository record enriched with activity statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryDetails {
    /// Base repository record
    pub repository: Repository,
    /// Recent activity
    pub stats: RepositoryStats,
}

/// Flat set of metrics used when comparing repositories side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// `owner/name`
    pub full_name: String,
    /// Repository name
    pub name: String,
    /// Description, empty when absent
    pub description: String,
    /// Primary language, "Unknown" when absent
    pub language: String,
    /// Stargazer count
    pub stars: u64,
    /// Fork count
    pub forks: u64,
    /// Watcher count
    pub watchers: u64,
    /// Open issue count
    pub open_issues: u64,
    /// Size in kilobytes
    pub size: u64,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Last metadata update
    pub updated_at: Option<DateTime<Utc>>,
    /// Last push
    pub pushed_at: Option<DateTime<Utc>>,
    /// Recent activity
    #[serde(flatten)]
    pub stats: RepositoryStats,
    /// License name or [`NO_LICENSE`]
    pub license: String,
}

impl From<RepositoryDetails> for ComparisonEntry {
    fn from(details: RepositoryDetails) -> Self {
        let RepositoryDetails { repository, stats } = details;
        Self {
            full_name: repository.display_name(),
            description: repository.description.unwrap_or_default(),
            language: repository
                .language
                .unwrap_or_else(|| "Unknown".to_owned()),
            stars: repository.stars,
            forks: repository.forks,
            watchers: repository.watchers,
            open_issues: repository.open_issues,
            size: repository.size,
            created_at: repository.created_at,
            updated_at: repository.updated_at,
            pushed_at: repository.pushed_at,
            stats,
            license: repository
                .license
                .map_or_else(|| NO_LICENSE.to_owned(), |license| license.name),
            name: repository.name,
        }
    }
}

/// Ordering direction for search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Structured repository search handed to a [`crate::RepositoryProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text search terms, may contain GitHub qualifiers
    pub query: String,
    /// Language qualifier appended to the terms
    pub language: Option<String>,
    /// Sort key
    pub sort: SortKey,
    /// Sort direction
    pub order: SortOrder,
    /// Page size
    pub per_page: u32,
}

impl SearchRequest {
    /// Creates a request sorted by stars, descending, 20 results.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: None,
            sort: SortKey::Stars,
            order: SortOrder::Desc,
            per_page: 20,
        }
    }

    /// Restricts results to a language.
    #[must_use]
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Sets the sort key.
    #[must_use]
    pub fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the sort direction.
    #[must_use]
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Search string with the language qualifier applied, as sent in `q`.
    pub fn search_terms(&self) -> String {
        match &self.language {
            Some(language) => format!("{} language:{language}", self.query)
                .trim()
                .to_owned(),
            None => self.query.trim().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repository_accepts_github_field_names() {
        let raw = json!({
            "name": "flask",
            "full_name": "pallets/flask",
            "owner": { "login": "pallets" },
            "description": "The Python micro framework",
            "stargazers_count": 66847,
            "forks": 16234,
            "forks_count": 16234,
            "watchers": 66847,
            "watchers_count": 66847,
            "open_issues": 12,
            "open_issues_count": 12,
            "language": "Python",
            "html_url": "https://github.com/pallets/flask",
            "license": { "name": "BSD-3-Clause" },
            "updated_at": "2024-01-14T08:45:00Z"
        });
        let repo: Repository = serde_json::from_value(raw).unwrap();
        assert_eq!(repo.stars, 66847);
        assert_eq!(repo.forks, 16234);
        assert_eq!(repo.owner_and_name(), Some(("pallets".to_owned(), "flask".to_owned())));
        assert!(repo.updated_at.is_some());
    }

    #[test]
    fn test_display_name_falls_back_to_owner() {
        let repo = Repository {
            name: "tokio".to_owned(),
            owner: RepositoryOwner {
                login: "tokio-rs".to_owned(),
            },
            ..Repository::default()
        };
        assert_eq!(repo.display_name(), "tokio-rs/tokio");
    }

    #[test]
    fn test_comparison_entry_defaults() {
        let details = RepositoryDetails {
            repository: Repository {
                name: "vue".to_owned(),
                full_name: "vuejs/vue".to_owned(),
                stars: 10,
                ..Repository::default()
            },
            stats: RepositoryStats {
                recent_commits: 4,
                ..RepositoryStats::default()
            },
        };
        let entry = ComparisonEntry::from(details);
        assert_eq!(entry.language, "Unknown");
        assert_eq!(entry.license, NO_LICENSE);
        assert_eq!(entry.stats.recent_commits, 4);
        assert_eq!(entry.full_name, "vuejs/vue");
    }

    #[test]
    fn test_search_terms_with_language() {
        let request = SearchRequest::new("web framework").with_language(Some("python".to_owned()));
        assert_eq!(request.search_terms(), "web framework language:python");

        let bare = SearchRequest::new("").with_language(Some("go".to_owned()));
        assert_eq!(bare.search_terms(), "language:go");
    }
}
