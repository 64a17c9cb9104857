//! repoquery - answers natural-language questions about GitHub repositories

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser as _;
use console::Term;
use repoquery_core::AppConfig;

use cli::Cli;

mod cli;
mod handlers;
mod interactive;
mod output;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    handlers::init_logging(cli.debug, &AppConfig::config_dir()?)?;
    let config = handlers::load_config();
    let json = handlers::wants_json(&cli, &config);
    let mut agent = handlers::build_agent(&cli, &config)?;

    let stdout = Term::stdout();
    if !json && cli.token.is_none() && config.github_token().is_none() {
        output::write_token_warning(&Term::stderr())?;
    }

    let Some(query) = cli.query.as_deref() else {
        interactive::run(&mut agent, json).await?;
        return Ok(ExitCode::SUCCESS);
    };

    let reply = agent.process(query).await;
    if json {
        output::write_json(&stdout, &reply)?;
    } else {
        output::write_reply(&stdout, &reply)?;
    }

    Ok(if reply.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
