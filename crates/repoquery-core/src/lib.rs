//! Core types and traits for repoquery.
//!
//! This crate provides the parsed-query data model, repository records, error
//! handling, configuration, and the trait seams shared by the parser, the
//! text-generation providers, the GitHub client and the agent.

/// Application configuration loaded from `~/.repoquery/config.toml`.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Prompt and completion types exchanged with text-generation providers.
pub mod prompt;
/// Structured query produced by the natural-language parser.
pub mod query;
/// Repository records returned by repository-data providers.
pub mod repository;
/// Synchronization helpers.
pub mod sync;
/// Trait definitions for text-generation and repository-data providers.
pub mod traits;

pub use config::{AppConfig, GitHubConfig, LlmConfig, OutputConfig};
pub use error::{Error, Result};
pub use prompt::{Completion, Prompt, TokenUsage};
pub use query::{Filters, ParsedQuery, ProjectType, QueryIntent, SortKey};
pub use repository::{
    ComparisonEntry, Repository, RepositoryDetails, RepositoryStats, SearchRequest, SortOrder,
};
pub use sync::IgnoreLock;
pub use traits::{ModelProvider, RepositoryProvider};
