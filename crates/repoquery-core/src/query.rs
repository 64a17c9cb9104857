//! Structured query produced by the natural-language parser.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Default number of results requested when the query names no number.
pub const DEFAULT_LIMIT: u32 = 10;
/// Upper bound for the number of results a query may request.
pub const MAX_LIMIT: u32 = 50;

/// High-level category of what the user is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryIntent {
    /// "top 5 most starred ..."
    Ranking,
    /// "compare React vs Vue"
    Comparison,
    /// "trending projects this week"
    Trending,
    /// "find projects about ..."
    Search,
    /// Nothing actionable could be understood
    #[default]
    Unknown,
}

impl QueryIntent {
    /// Lowercase identifier used in logs, JSON output and prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ranking => "ranking",
            Self::Comparison => "comparison",
            Self::Trending => "trending",
            Self::Search => "search",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Kind of project the user is looking for, always in singular form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// framework / frameworks
    Framework,
    /// library / libraries
    Library,
    /// tool / tools
    Tool,
    /// package / packages
    Package,
    /// module / modules
    Module,
    /// plugin / plugins
    Plugin,
    /// extension / extensions
    Extension,
    /// sdk
    Sdk,
    /// api
    Api,
    /// service
    Service,
    /// app
    App,
    /// application
    Application,
}

impl ProjectType {
    /// Canonical singular noun.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Framework => "framework",
            Self::Library => "library",
            Self::Tool => "tool",
            Self::Package => "package",
            Self::Module => "module",
            Self::Plugin => "plugin",
            Self::Extension => "extension",
            Self::Sdk => "sdk",
            Self::Api => "api",
            Self::Service => "service",
            Self::App => "app",
            Self::Application => "application",
        }
    }

    /// Resolves a singular or plural noun to its project type.
    pub fn from_noun(noun: &str) -> Option<Self> {
        let singular = match noun {
            "libraries" => "library",
            "frameworks" => "framework",
            other => other.strip_suffix('s').unwrap_or(other),
        };
        match singular {
            "framework" => Some(Self::Framework),
            "library" => Some(Self::Library),
            "tool" => Some(Self::Tool),
            "package" => Some(Self::Package),
            "module" => Some(Self::Module),
            "plugin" => Some(Self::Plugin),
            "extension" => Some(Self::Extension),
            "sdk" => Some(Self::Sdk),
            "api" => Some(Self::Api),
            "service" => Some(Self::Service),
            "app" => Some(Self::App),
            "application" => Some(Self::Application),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Repository attribute used to order results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Stargazer count
    #[default]
    Stars,
    /// Fork count
    Forks,
    /// Last update time
    Updated,
}

impl SortKey {
    /// Value accepted by the GitHub search API `sort` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stars => "stars",
            Self::Forks => "forks",
            Self::Updated => "updated",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Optional constraints extracted from time-window and activity keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// Only consider repositories active within this many days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    /// Minimum star count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stars: Option<u64>,
    /// Maximum star count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stars: Option<u64>,
    /// Minimum repository size in kilobytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
    /// Maximum repository size in kilobytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
}

impl Filters {
    /// Returns true when no filter is set.
    pub fn is_empty(&self) -> bool {
        self.days.is_none()
            && self.min_stars.is_none()
            && self.max_stars.is_none()
            && self.min_size.is_none()
            && self.max_size.is_none()
    }

    /// Overlays every filter set in `other` onto `self`.
    pub fn merge(&mut self, other: &Self) {
        if other.days.is_some() {
            self.days = other.days;
        }
        if other.min_stars.is_some() {
            self.min_stars = other.min_stars;
        }
        if other.max_stars.is_some() {
            self.max_stars = other.max_stars;
        }
        if other.min_size.is_some() {
            self.min_size = other.min_size;
        }
        if other.max_size.is_some() {
            self.max_size = other.max_size;
        }
    }
}

/// Structured, executable form of a natural-language repository question.
///
/// Built fresh by a parser for every input and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// What the user wants
    pub intent: QueryIntent,
    /// Canonical lowercase programming language, if one was named
    pub language: Option<String>,
    /// Kind of project, if one was named
    pub project_type: Option<ProjectType>,
    /// Result ordering
    pub sort_by: SortKey,
    /// Number of results requested, within `1..=MAX_LIMIT`
    pub limit: u32,
    /// Up to two comparison subjects, verbatim
    pub repositories: Vec<String>,
    /// Time-window and activity filters
    pub filters: Filters,
    /// Input text exactly as received
    pub original_query: String,
    /// Heuristic certainty in `[0, 1]`
    pub confidence: f64,
    /// Up to three domain terms that sharpen downstream searches
    #[serde(default)]
    pub domain_keywords: Vec<String>,
}

impl ParsedQuery {
    /// Creates an empty `Unknown` query for the given input.
    pub fn new(original_query: impl Into<String>) -> Self {
        Self {
            intent: QueryIntent::Unknown,
            language: None,
            project_type: None,
            sort_by: SortKey::Stars,
            limit: DEFAULT_LIMIT,
            repositories: Vec::new(),
            filters: Filters::default(),
            original_query: original_query.into(),
            confidence: 0.0,
            domain_keywords: Vec::new(),
        }
    }
}
