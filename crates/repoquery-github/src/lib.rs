//! GitHub REST client used as the repository-data provider.

/// TTL cache for raw API responses.
pub mod cache;
/// HTTP client implementing [`repoquery_core::RepositoryProvider`].
pub mod client;
/// Labelled demonstration data served when the API cannot be reached.
pub mod demo;

pub use cache::ResponseCache;
pub use client::GitHubClient;
