//! Error type shared across the workspace.

use core::result::Result as CoreResult;
use std::io::Error as IoError;

use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for repoquery operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur across the repoquery crates.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// An HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A text-generation provider encountered an error.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Required API key was not found.
    #[error("API key not found: {0}")]
    MissingApiKey(String),

    /// A provider returned a response that could not be interpreted.
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    /// The GitHub API answered with a non-success status.
    #[error("GitHub API error {status}: {message}")]
    GitHub {
        /// HTTP status code returned by the API
        status: u16,
        /// Body or reason reported by the API
        message: String,
    },

    /// The GitHub API rate limit was exhausted and could not be waited out.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// An operation did not finish within its time budget.
    #[error("Timed out after {0}ms")]
    Timeout(u64),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Determines whether this error may succeed if retried.
    ///
    /// Network failures, provider hiccups, timeouts and server-side GitHub
    /// errors are transient; everything else is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(_) | Self::Provider(_) | Self::Timeout(_) => true,
            Self::GitHub { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
