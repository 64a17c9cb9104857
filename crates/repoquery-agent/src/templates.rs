//! Markdown answers rendered without a text-generation provider.

use core::fmt::{self, Write};

use chrono::{DateTime, Utc};
use repoquery_core::{ComparisonEntry, ParsedQuery, QueryIntent, Repository};

use crate::handlers::AnalysisData;

const RANKING_DESCRIPTION_CHARS: usize = 100;
const TRENDING_DESCRIPTION_CHARS: usize = 80;
const SEARCH_DESCRIPTION_CHARS: usize = 100;
const TRENDING_SHOWN: usize = 10;
const SEARCH_SHOWN: usize = 8;

const NO_DESCRIPTION: &str = "No description available";

/// Formats an integer with comma thousands separators.
#[must_use]
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}

/// Cuts `text` to `max_chars` characters, appending "..." when anything was dropped.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

/// Upper-cases the first letter of every alphabetic run.
fn title_case(text: &str) -> String {
    let mut titled = String::with_capacity(text.len());
    let mut at_word_start = true;
    for character in text.chars() {
        if character.is_alphabetic() {
            if at_word_start {
                titled.extend(character.to_uppercase());
            } else {
                titled.extend(character.to_lowercase());
            }
            at_word_start = false;
        } else {
            titled.push(character);
            at_word_start = true;
        }
    }
    titled
}

fn date_or_unknown(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map_or_else(
        || "Unknown".to_owned(),
        |timestamp| timestamp.format("%Y-%m-%d").to_string(),
    )
}

/// Renders the template matching the query intent.
#[must_use]
pub fn render(parsed: &ParsedQuery, data: &AnalysisData) -> String {
    match (parsed.intent, data) {
        (_, AnalysisData::Comparison(entries)) => comparison(entries),
        (QueryIntent::Ranking, AnalysisData::Repositories(repositories)) => {
            ranking(repositories, parsed.language.as_deref(), parsed.limit)
        }
        (QueryIntent::Trending, AnalysisData::Repositories(repositories)) => {
            trending(repositories, parsed.language.as_deref())
        }
        (_, AnalysisData::Repositories(repositories)) => {
            search(repositories, &parsed.original_query)
        }
    }
}

/// Runs `write` against a fresh buffer.
fn written(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut response = String::new();
    match write(&mut response) {
        Ok(()) => response,
        // Writing into a `String` never fails.
        Err(fmt::Error) => String::new(),
    }
}

/// Numbered list of the most starred repositories.
#[must_use]
pub fn ranking(repositories: &[Repository], language: Option<&str>, limit: u32) -> String {
    written(|out| write_ranking(out, repositories, language, limit))
}

/// Appends the ranking answer to `out`.
///
/// # Errors
/// Returns an error if the underlying writer fails.
pub fn write_ranking(
    out: &mut impl Write,
    repositories: &[Repository],
    language: Option<&str>,
    limit: u32,
) -> fmt::Result {
    if repositories.is_empty() {
        return match language {
            Some(language) => {
                write!(out, "I couldn't find any {language} repositories matching your criteria.")
            }
            None => write!(out, "I couldn't find any repositories matching your criteria."),
        };
    }

    let shown = repositories
        .len()
        .min(usize::try_from(limit).unwrap_or(usize::MAX));
    match language {
        Some(language) => {
            write!(out, "Here are the top {shown} most starred {language} repositories:\n\n")?;
        }
        None => write!(out, "Here are the top {shown} most starred repositories:\n\n")?,
    }

    for (position, repository) in repositories.iter().take(shown).enumerate() {
        let description = repository.description.as_deref().unwrap_or(NO_DESCRIPTION);
        write!(
            out,
            "{}. **{}** ⭐ {}\n   {}\n\n",
            position + 1,
            repository.display_name(),
            thousands(repository.stars),
            truncate(description, RANKING_DESCRIPTION_CHARS),
        )?;
    }
    Ok(())
}

/// Side-by-side comparison sections.
#[must_use]
pub fn comparison(entries: &[ComparisonEntry]) -> String {
    written(|out| write_comparison(out, entries))
}

/// Appends the comparison answer to `out`.
///
/// # Errors
/// Returns an error if the underlying writer fails.
pub fn write_comparison(out: &mut impl Write, entries: &[ComparisonEntry]) -> fmt::Result {
    if entries.is_empty() {
        return write!(out, "I couldn't retrieve comparison data for the requested repositories.");
    }

    write!(out, "## Repository Comparison\n\n")?;
    for entry in entries {
        write!(
            out,
            "### {}\n- **Stars**: {}\n- **Forks**: {}\n- **Language**: {}\n\
             - **Recent Commits**: {}\n- **Contributors**: {}\n- **Last Updated**: {}\n\n",
            entry.full_name,
            thousands(entry.stars),
            thousands(entry.forks),
            entry.language,
            entry.stats.recent_commits,
            entry.stats.contributors_count,
            date_or_unknown(entry.updated_at),
        )?;
    }

    if let [first, second] = entries {
        let star_leader = if first.stars > second.stars { "first" } else { "second" };
        let activity_leader = if first.stats.recent_commits > second.stats.recent_commits {
            "first"
        } else {
            "second"
        };
        write!(
            out,
            "**Analysis**: The {star_leader} repository has more stars, \
             while the {activity_leader} repository shows more recent activity."
        )?;
    }
    Ok(())
}

/// Recently active repositories.
#[must_use]
pub fn trending(repositories: &[Repository], language: Option<&str>) -> String {
    written(|out| write_trending(out, repositories, language))
}

/// Appends the trending answer to `out`.
///
/// # Errors
/// Returns an error if the underlying writer fails.
pub fn write_trending(
    out: &mut impl Write,
    repositories: &[Repository],
    language: Option<&str>,
) -> fmt::Result {
    if repositories.is_empty() {
        return write!(out, "I couldn't find any trending repositories matching your criteria.");
    }

    let heading = language.map_or_else(String::new, |language| format!("{} ", title_case(language)));
    write!(out, "## Trending {heading}Repositories\n\n")?;

    for (position, repository) in repositories.iter().take(TRENDING_SHOWN).enumerate() {
        write!(
            out,
            "{}. **{}** ({})\n   ⭐ {} stars | Updated: {}\n",
            position + 1,
            repository.display_name(),
            repository.language.as_deref().unwrap_or("Multiple"),
            thousands(repository.stars),
            date_or_unknown(repository.updated_at),
        )?;
        if let Some(description) = repository.description.as_deref().filter(|text| !text.is_empty()) {
            writeln!(out, "   {}", truncate(description, TRENDING_DESCRIPTION_CHARS))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Generic search results.
#[must_use]
pub fn search(repositories: &[Repository], query: &str) -> String {
    written(|out| write_search(out, repositories, query))
}

/// Appends the search answer to `out`.
///
/// # Errors
/// Returns an error if the underlying writer fails.
pub fn write_search(out: &mut impl Write, repositories: &[Repository], query: &str) -> fmt::Result {
    if repositories.is_empty() {
        return write!(out, "I couldn't find any repositories matching your search criteria.");
    }

    write!(
        out,
        "Found {} repositories related to '{query}':\n\n",
        repositories.len()
    )?;
    for (position, repository) in repositories.iter().take(SEARCH_SHOWN).enumerate() {
        writeln!(
            out,
            "{}. **{}** ({}) - ⭐ {}",
            position + 1,
            repository.display_name(),
            repository.language.as_deref().unwrap_or("Multiple"),
            thousands(repository.stars),
        )?;
        if let Some(description) = repository.description.as_deref().filter(|text| !text.is_empty()) {
            writeln!(out, "   {}", truncate(description, SEARCH_DESCRIPTION_CHARS))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
