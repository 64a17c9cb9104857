//! Startup: logging, configuration and agent assembly

use anyhow::Result;
use repoquery_agent::{Agent, ResponseGenerator};
use repoquery_core::{AppConfig, ModelProvider, RepositoryProvider};
use repoquery_github::GitHubClient;
use repoquery_parser::{LlmQueryParser, QueryParser, RuleBasedParser};
use repoquery_providers::{OllamaProvider, OpenAiProvider};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

use crate::cli::Cli;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "repoquery=info";
/// Filter used with `--debug`.
const DEBUG_FILTER: &str = "repoquery=debug";
/// Log file inside the configuration directory.
const LOG_FILE: &str = "repoquery.log";

/// Initialize tracing: stderr at debug level with `--debug`, otherwise the log file
///
/// # Errors
/// Returns an error if the log directory or file cannot be created
pub fn init_logging(debug: bool, config_dir: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| (if debug { DEBUG_FILTER } else { DEFAULT_FILTER }).into());

    if debug {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .init();
        return Ok(());
    }

    fs::create_dir_all(config_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config_dir.join(LOG_FILE))?;

    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false)
                .with_target(true)
                .with_level(true),
        )
        .init();
    Ok(())
}

/// Load `~/.repoquery/config.toml`, creating it on first run
pub fn load_config() -> AppConfig {
    AppConfig::load_or_create().unwrap_or_else(|error| {
        warn!("Failed to load config from ~/.repoquery/config.toml: {error}");
        warn!("Using default configuration");
        AppConfig::default()
    })
}

/// Build the agent from configuration and command-line overrides
///
/// # Errors
/// Returns an error if the GitHub client cannot be constructed
pub fn build_agent(cli: &Cli, config: &AppConfig) -> Result<Agent> {
    let mut github = config.github.clone();
    github.token = cli.token.clone().or_else(|| config.github_token());
    if github.token.is_none() {
        info!("No GitHub token configured, requests are unauthenticated");
    }
    let repositories: Arc<dyn RepositoryProvider> = Arc::new(GitHubClient::new(github)?);

    let openai: Option<Arc<dyn ModelProvider>> = cli
        .openai_key
        .clone()
        .or_else(|| config.openai_api_key())
        .and_then(|key| match OpenAiProvider::from_config(key, &config.llm) {
            Ok(provider) => Some(Arc::new(provider) as Arc<dyn ModelProvider>),
            Err(error) => {
                warn!("Ignoring OpenAI key: {error}");
                None
            }
        });

    let parser: Arc<dyn QueryParser> = match &openai {
        Some(provider) => {
            info!("Using model-assisted query parser");
            Arc::new(
                LlmQueryParser::new(Arc::clone(provider))
                    .with_timeout(Duration::from_secs(config.llm.parse_timeout_seconds)),
            )
        }
        None => {
            info!("Using rule-based query parser");
            Arc::new(RuleBasedParser::new())
        }
    };

    let mut responder =
        ResponseGenerator::templates_only().with_ollama(Arc::new(OllamaProvider::from_config(&config.llm)));
    match openai {
        Some(provider) => responder = responder.with_openai(provider, cli.complete),
        None if cli.complete => warn!("--complete needs an OpenAI API key, using local responses"),
        None => {}
    }

    Ok(Agent::new(parser, repositories).with_responder(responder))
}

/// Whether replies should be printed as JSON
pub fn wants_json(cli: &Cli, config: &AppConfig) -> bool {
    cli.json || config.output.json
}
