//! Interactive question loop over stdin

use anyhow::Result;
use console::{Term, style};
use repoquery_agent::Agent;
use tokio::io::{AsyncBufReadExt as _, BufReader, stdin};

use crate::output;

const HELP_TEXT: &str = "\
Ask a question about GitHub repositories, for example:
  top 5 Python web frameworks
  compare React vs Vue
  trending Rust projects this week
  find machine learning libraries

Commands:
  help      Show this message
  history   List the questions asked this session
  clear     Forget the session history
  quit      Leave (also: exit, q)";

/// A line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input<'line> {
    Help,
    History,
    Clear,
    Quit,
    Empty,
    Question(&'line str),
}

fn classify(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "" => Input::Empty,
        "help" | "?" => Input::Help,
        "history" => Input::History,
        "clear" => Input::Clear,
        "quit" | "exit" | "q" => Input::Quit,
        _ => Input::Question(trimmed),
    }
}

/// Read questions until `quit` or end of input
///
/// # Errors
/// Returns an error if stdin cannot be read or the terminal write fails
pub async fn run(agent: &mut Agent, json: bool) -> Result<()> {
    let term = Term::stdout();
    term.write_line(&format!(
        "{}",
        style("🚀 repoquery interactive mode").cyan().bold()
    ))?;
    term.write_line(&format!("{}", style("Type 'help' for examples, 'quit' to leave.").dim()))?;

    let mut lines = BufReader::new(stdin()).lines();
    loop {
        term.write_str("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match classify(&line) {
            Input::Empty => {}
            Input::Help => term.write_line(HELP_TEXT)?,
            Input::History => output::write_history(&term, agent.history())?,
            Input::Clear => {
                agent.clear_history();
                term.write_line("History cleared.")?;
            }
            Input::Quit => break,
            Input::Question(question) => {
                let reply = agent.process(question).await;
                if json {
                    output::write_json(&term, &reply)?;
                } else {
                    output::write_reply(&term, &reply)?;
                }
            }
        }
    }

    term.write_line("")?;
    term.write_line("👋 Goodbye!")?;
    Ok(())
}
