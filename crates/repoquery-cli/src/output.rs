//! Printing replies to the terminal

use anyhow::Result;
use console::{Term, style};
use repoquery_agent::{AgentReply, HistoryEntry};

/// Print a reply as pretty JSON
///
/// # Errors
/// Returns an error if serialization or the terminal write fails
pub fn write_json(term: &Term, reply: &AgentReply) -> Result<()> {
    term.write_line(&serde_json::to_string_pretty(reply)?)?;
    Ok(())
}

/// Print a reply for a human reader
///
/// # Errors
/// Returns an error if the terminal write fails
pub fn write_reply(term: &Term, reply: &AgentReply) -> Result<()> {
    term.write_line("")?;
    if reply.success {
        let intent = reply.intent.map_or("unknown", |intent| intent.as_str());
        term.write_line(&format!(
            "{}",
            style(format!("🤖 Analysis Result (Intent: {intent})")).green().bold()
        ))?;
        term.write_line(&reply.response)?;

        if let Some(metadata) = &reply.metadata {
            term.write_line(&format!(
                "{}",
                style(format!(
                    "Language: {} | Repos Found: {} | {} ms",
                    metadata.language.as_deref().unwrap_or("N/A"),
                    metadata.repositories_found,
                    metadata.processing_time_ms
                ))
                .dim()
            ))?;
        }
    } else {
        term.write_line(&format!("{}", style("❌ Error").red().bold()))?;
        term.write_line(&format!("{}", style(&reply.response).red()))?;

        if !reply.suggestions.is_empty() {
            term.write_line(&format!("{}", style("💡 Suggestions").yellow().bold()))?;
            for suggestion in &reply.suggestions {
                term.write_line(&format!("  • {suggestion}"))?;
            }
        }
    }
    term.write_line("")?;
    Ok(())
}

/// Print the session history
///
/// # Errors
/// Returns an error if the terminal write fails
pub fn write_history(term: &Term, history: &[HistoryEntry]) -> Result<()> {
    if history.is_empty() {
        term.write_line(&format!("{}", style("No questions asked yet.").dim()))?;
        return Ok(());
    }
    for (position, entry) in history.iter().enumerate() {
        term.write_line(&format!(
            "{}. [{}] {} {}",
            position + 1,
            entry.timestamp.format("%H:%M:%S"),
            entry.query,
            style(format!("({})", entry.intent)).dim()
        ))?;
    }
    Ok(())
}

/// Warn that GitHub requests will be unauthenticated
///
/// # Errors
/// Returns an error if the terminal write fails
pub fn write_token_warning(term: &Term) -> Result<()> {
    term.write_line(&format!("{}", style("⚠️  Warning: No GitHub token provided.").yellow()))?;
    term.write_line("   You can still use the agent, but with limited API rate limits.")?;
    term.write_line("   Get a token at: https://github.com/settings/tokens")?;
    term.write_line("   Set it with: export GITHUB_TOKEN=your_token_here")?;
    term.write_line("")?;
    Ok(())
}
