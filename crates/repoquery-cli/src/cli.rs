//! Command-line arguments.

use clap::Parser;

/// Command-line arguments for repoquery
#[derive(Debug, Parser)]
#[command(name = "repoquery", version)]
#[command(about = "Ask questions about GitHub repositories in plain English")]
#[command(after_help = "\
Examples:
  repoquery
  repoquery --query \"top 5 Python web frameworks\"
  repoquery --query \"compare React vs Vue\" --json

Environment variables:
  GITHUB_TOKEN      GitHub personal access token for higher rate limits
  OPENAI_API_KEY    OpenAI API key for model-assisted parsing
  RUST_LOG          Log filter, defaults to repoquery=info")]
pub struct Cli {
    /// GitHub personal access token (overrides config and GITHUB_TOKEN)
    #[arg(short, long)]
    pub token: Option<String>,

    /// OpenAI API key for model-assisted parsing (overrides config and `OPENAI_API_KEY`)
    #[arg(short, long = "openai-key")]
    pub openai_key: Option<String>,

    /// Answer a single question and exit
    #[arg(short, long)]
    pub query: Option<String>,

    /// Print replies as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Log at debug level to stderr instead of the log file
    #[arg(short, long)]
    pub debug: bool,

    /// Write answers with OpenAI (requires an OpenAI key)
    #[arg(short, long)]
    pub complete: bool,
}
