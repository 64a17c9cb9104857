//! GitHub REST client implementing [`RepositoryProvider`].

use async_trait::async_trait;
use chrono::Utc;
use repoquery_core::traits::days_ago;
use repoquery_core::{
    Error, GitHubConfig, Repository, RepositoryDetails, RepositoryProvider, RepositoryStats,
    Result, SearchRequest,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::cache::ResponseCache;
use crate::demo::demo_repositories;

/// GitHub REST API version header value.
const API_VERSION: &str = "2022-11-28";
/// User agent sent with every request; GitHub rejects requests without one.
const USER_AGENT: &str = concat!("repoquery/", env!("CARGO_PKG_VERSION"));
/// Largest page GitHub serves.
const MAX_PER_PAGE: u32 = 100;
/// Window for activity statistics, in days.
const STATS_WINDOW_DAYS: u32 = 30;
/// Attempt timeout used when the configuration lists none.
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of `GET /search/repositories`.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Repository>,
}

/// Only the field that tells issues and pull requests apart.
#[derive(Debug, Deserialize)]
struct IssueItem {
    #[serde(default)]
    pull_request: Option<Value>,
}

/// Client for the GitHub REST API with caching, retries and rate-limit handling.
pub struct GitHubClient {
    http: Client,
    config: GitHubConfig,
    cache: Mutex<ResponseCache>,
}

impl GitHubClient {
    /// Creates a client from the `github` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        if let Some(token) = config.token.as_deref().filter(|token| !token.is_empty()) {
            let value = HeaderValue::from_str(&format!("token {token}"))
                .map_err(|err| Error::Config(format!("Invalid GitHub token: {err}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()?;
        let cache = Mutex::new(ResponseCache::new(Duration::from_secs(
            config.cache_ttl_seconds,
        )));

        Ok(Self {
            http,
            config,
            cache,
        })
    }

    /// Whether requests carry an access token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.config.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// Drops every cached response.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    fn attempt_timeouts(&self) -> Vec<Duration> {
        if self.config.attempt_timeouts_seconds.is_empty() {
            return vec![FALLBACK_TIMEOUT];
        }
        self.config
            .attempt_timeouts_seconds
            .iter()
            .map(|seconds| Duration::from_secs(*seconds))
            .collect()
    }

    /// GETs an endpoint as JSON through the cache, retrying transient failures.
    async fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let key = ResponseCache::key(endpoint, params);
        if let Some(cached) = self.cache.lock().await.get(&key) {
            debug!("Using cached data for {endpoint}");
            return Ok(cached);
        }

        let url = format!(
            "{}/{}",
            self.config.api_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        let timeouts = self.attempt_timeouts();
        let attempts = timeouts.len();
        let mut last_error = None;

        for (index, timeout) in timeouts.into_iter().enumerate() {
            let attempt = index + 1;
            info!(
                "Making GitHub API request to: {endpoint} (attempt {attempt}/{attempts}, timeout: {}s)",
                timeout.as_secs()
            );
            match self.fetch(&url, params, timeout).await {
                Ok(value) => {
                    self.cache.lock().await.put(key, value.clone());
                    debug!("Retrieved {endpoint} on attempt {attempt}");
                    return Ok(value);
                }
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    warn!("GitHub API request attempt {attempt} failed: {err}");
                    last_error = Some(err);
                    if attempt < attempts {
                        sleep(Duration::from_secs(self.config.retry_delay_seconds)).await;
                    }
                }
            }
        }

        let err = last_error.unwrap_or_else(|| Error::Other("No request attempts made".to_owned()));
        error!("All {attempts} attempts failed for {endpoint}. Last error: {err}");
        Err(err)
    }

    /// One attempt, including a single wait-and-resend after a rate-limit response.
    async fn fetch(&self, url: &str, params: &[(&str, String)], timeout: Duration) -> Result<Value> {
        let mut response = self.send(url, params, timeout).await?;

        if response.status() == StatusCode::FORBIDDEN {
            let reset = rate_limit_reset(&response);
            let body = response.text().await.unwrap_or_default();
            if !is_rate_limit_message(&body) {
                return Err(Error::GitHub {
                    status: StatusCode::FORBIDDEN.as_u16(),
                    message: body,
                });
            }
            let wait = self.rate_limit_wait(reset)?;
            warn!("Rate limited. Waiting {} seconds...", wait.as_secs());
            sleep(wait).await;
            response = self.send(url, params, timeout).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            if status == StatusCode::FORBIDDEN && is_rate_limit_message(&message) {
                return Err(Error::RateLimited(message));
            }
            return Err(Error::GitHub {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    async fn send(&self, url: &str, params: &[(&str, String)], timeout: Duration) -> Result<Response> {
        self.http
            .get(url)
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    Error::Timeout(timeout.as_millis() as u64)
                } else {
                    Error::Request(err)
                }
            })
    }

    /// Time until the rate limit resets, floored and capped by configuration.
    fn rate_limit_wait(&self, reset_epoch_seconds: i64) -> Result<Duration> {
        let until_reset = reset_epoch_seconds.saturating_sub(Utc::now().timestamp());
        let wait = u64::try_from(until_reset)
            .unwrap_or(0)
            .max(self.config.min_rate_limit_wait_seconds);
        if wait > self.config.max_rate_limit_wait_seconds {
            return Err(Error::RateLimited(format!(
                "reset in {wait}s exceeds the {}s wait limit",
                self.config.max_rate_limit_wait_seconds
            )));
        }
        Ok(Duration::from_secs(wait))
    }

    async fn search_api(&self, request: &SearchRequest) -> Result<Vec<Repository>> {
        let params = [
            ("q", request.search_terms()),
            ("sort", request.sort.to_string()),
            ("order", request.order.to_string()),
            ("per_page", request.per_page.min(MAX_PER_PAGE).to_string()),
        ];
        let value = self.get_json("search/repositories", &params).await?;
        let response: SearchResponse = serde_json::from_value(value)?;
        Ok(response.items)
    }

    async fn fetch_list(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Vec<Value>> {
        let value = self.get_json(endpoint, params).await?;
        Ok(match value {
            Value::Array(items) => items,
            _ => Vec::new(),
        })
    }

    /// Commits, issues, pull requests and contributors over the last 30 days.
    /// Each figure that cannot be fetched stays at zero.
    async fn repository_stats(&self, owner: &str, name: &str) -> RepositoryStats {
        let mut stats = RepositoryStats::default();
        let since = format!("{}T00:00:00Z", days_ago(STATS_WINDOW_DAYS));
        let per_page = MAX_PER_PAGE.to_string();

        match self
            .fetch_list(
                &format!("repos/{owner}/{name}/commits"),
                &[("since", since.clone()), ("per_page", per_page.clone())],
            )
            .await
        {
            Ok(commits) => stats.recent_commits = commits.len() as u64,
            Err(err) => warn!("Failed to get recent commits for {owner}/{name}: {err}"),
        }

        match self
            .fetch_list(
                &format!("repos/{owner}/{name}/issues"),
                &[
                    ("state", "all".to_owned()),
                    ("since", since),
                    ("per_page", per_page.clone()),
                ],
            )
            .await
        {
            Ok(items) => {
                let (prs, issues): (Vec<IssueItem>, Vec<IssueItem>) = items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value::<IssueItem>(item).ok())
                    .partition(|item| item.pull_request.is_some());
                stats.recent_issues = issues.len() as u64;
                stats.recent_prs = prs.len() as u64;
            }
            Err(err) => warn!("Failed to get recent issues for {owner}/{name}: {err}"),
        }

        match self
            .fetch_list(
                &format!("repos/{owner}/{name}/contributors"),
                &[("per_page", per_page)],
            )
            .await
        {
            Ok(contributors) => stats.contributors_count = contributors.len() as u64,
            Err(err) => warn!("Failed to get contributors for {owner}/{name}: {err}"),
        }

        stats
    }
}

fn is_rate_limit_message(body: &str) -> bool {
    body.to_lowercase().contains("rate limit")
}

fn rate_limit_reset(response: &Response) -> i64 {
    response
        .headers()
        .get("x-ratelimit-reset")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl RepositoryProvider for GitHubClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Repository>> {
        match self.search_api(request).await {
            Ok(repositories) => {
                info!(
                    "Found {} repositories for query: {}",
                    repositories.len(),
                    request.query
                );
                Ok(repositories)
            }
            Err(err) if self.config.demo_fallback => {
                error!("Repository search failed: {err}");
                warn!("GitHub API unavailable - using demonstration data");
                Ok(demo_repositories(request.language.as_deref(), &request.query))
            }
            Err(err) => Err(err),
        }
    }

    async fn details(&self, owner: &str, name: &str) -> Result<Option<RepositoryDetails>> {
        let value = match self.get_json(&format!("repos/{owner}/{name}"), &[]).await {
            Ok(value) => value,
            Err(err) => {
                error!("Failed to get repository details for {owner}/{name}: {err}");
                return Ok(None);
            }
        };
        let repository: Repository = serde_json::from_value(value)?;
        let stats = self.repository_stats(owner, name).await;
        Ok(Some(RepositoryDetails { repository, stats }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GitHubConfig {
        GitHubConfig {
            min_rate_limit_wait_seconds: 60,
            max_rate_limit_wait_seconds: 120,
            ..GitHubConfig::default()
        }
    }

    #[test]
    fn test_rate_limit_wait_has_a_floor() {
        let client = GitHubClient::new(config()).unwrap();
        let wait = client.rate_limit_wait(0).unwrap();
        assert_eq!(wait, Duration::from_secs(60));
    }

    #[test]
    fn test_rate_limit_wait_uses_reset_time() {
        let client = GitHubClient::new(config()).unwrap();
        let reset = Utc::now().timestamp() + 100;
        let wait = client.rate_limit_wait(reset).unwrap();
        assert!(wait >= Duration::from_secs(98) && wait <= Duration::from_secs(100));
    }

    #[test]
    fn test_rate_limit_wait_is_capped() {
        let client = GitHubClient::new(config()).unwrap();
        let reset = Utc::now().timestamp() + 3600;
        assert!(matches!(client.rate_limit_wait(reset), Err(Error::RateLimited(_))));
    }

    #[test]
    fn test_token_sets_authentication() {
        let anonymous = GitHubClient::new(GitHubConfig::default()).unwrap();
        assert!(!anonymous.is_authenticated());

        let authenticated = GitHubClient::new(GitHubConfig {
            token: Some("ghp_test".to_owned()),
            ..GitHubConfig::default()
        })
        .unwrap();
        assert!(authenticated.is_authenticated());
    }

    #[test]
    fn test_empty_timeout_list_still_attempts_once() {
        let client = GitHubClient::new(GitHubConfig {
            attempt_timeouts_seconds: Vec::new(),
            ..GitHubConfig::default()
        })
        .unwrap();
        assert_eq!(client.attempt_timeouts(), vec![FALLBACK_TIMEOUT]);
    }

    #[test]
    fn test_rate_limit_message_detection() {
        assert!(is_rate_limit_message("API rate limit exceeded for 1.2.3.4"));
        assert!(!is_rate_limit_message("Resource not accessible by integration"));
    }
}
