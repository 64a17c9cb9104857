//! Configuration for the GitHub client, text-generation providers and output.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Env var holding the GitHub personal access token.
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// Env var holding the `OpenAI` API key.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Complete application configuration.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitHub REST client settings
    pub github: GitHubConfig,
    /// Text-generation provider settings
    pub llm: LlmConfig,
    /// Output settings
    pub output: OutputConfig,
}

/// GitHub REST client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token for higher rate limits
    pub token: Option<String>,
    /// API base URL
    pub api_url: String,
    /// Seconds a cached response stays valid
    pub cache_ttl_seconds: u64,
    /// Per-attempt request timeouts in seconds; its length is the attempt count
    pub attempt_timeouts_seconds: Vec<u64>,
    /// Pause between failed attempts in seconds
    pub retry_delay_seconds: u64,
    /// Shortest wait after a rate-limit response, in seconds
    pub min_rate_limit_wait_seconds: u64,
    /// Longest rate-limit wait the client accepts before giving up, in seconds
    pub max_rate_limit_wait_seconds: u64,
    /// Serve labelled demonstration data when the API cannot be reached
    pub demo_fallback: bool,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.github.com".to_owned(),
            cache_ttl_seconds: 300,
            attempt_timeouts_seconds: vec![10, 20, 30],
            retry_delay_seconds: 2,
            min_rate_limit_wait_seconds: 60,
            max_rate_limit_wait_seconds: 900,
            demo_fallback: true,
        }
    }
}

/// Text-generation provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// `OpenAI` API key; enables the model-backed parser
    pub openai_api_key: Option<String>,
    /// Base URL of an `OpenAI`-compatible chat completions API
    pub openai_base_url: String,
    /// Preferred chat model
    pub openai_model: String,
    /// Model tried when the preferred one fails
    pub openai_fallback_model: String,
    /// Ollama server URL
    pub ollama_url: String,
    /// Ollama model name
    pub ollama_model: String,
    /// Seconds the model-backed parser waits before using the rule-based result
    pub parse_timeout_seconds: u64,
    /// Sampling temperature for generated answers
    pub temperature: f32,
    /// Completion budget for generated answers
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_owned(),
            openai_model: "gpt-5".to_owned(),
            openai_fallback_model: "gpt-4o".to_owned(),
            ollama_url: "http://localhost:11434".to_owned(),
            ollama_model: "llama2".to_owned(),
            parse_timeout_seconds: 10,
            temperature: 0.7,
            max_tokens: 800,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print replies as JSON instead of formatted text
    pub json: bool,
}

impl AppConfig {
    /// Get the default config directory path (`~/.repoquery`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".repoquery"))
    }

    /// Get the default config file path (`~/.repoquery/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location.
    /// If the config doesn't exist, creates it with default values.
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or created
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        tracing::debug!(
            "Loaded config from {}: github_token={}, openai_api_key={}",
            path.display(),
            if config.github.token.is_some() {
                "present"
            } else {
                "missing"
            },
            if config.llm.openai_api_key.is_some() {
                "present"
            } else {
                "missing"
            }
        );

        Ok(config)
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|error| Error::Config(format!("Failed to serialize config: {error}")))?;

        let header = "# repoquery configuration file\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize your settings\n\n";

        fs::write(path, format!("{header}{contents}"))?;
        Ok(())
    }

    /// GitHub token from the config file, then `GITHUB_TOKEN`.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .filter(|token| !token.is_empty())
            .or_else(|| env::var(ENV_GITHUB_TOKEN).ok())
            .filter(|token| !token.is_empty())
    }

    /// `OpenAI` key from the config file, then `OPENAI_API_KEY`.
    pub fn openai_api_key(&self) -> Option<String> {
        self.llm
            .openai_api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| env::var(ENV_OPENAI_API_KEY).ok())
            .filter(|key| !key.is_empty())
    }
}
