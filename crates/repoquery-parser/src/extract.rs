//! Slot extraction: language, project type, filters, limit and comparison subjects.
//!
//! All functions expect the lower-cased query text.

use regex::Regex;
use repoquery_core::query::MAX_LIMIT;
use repoquery_core::{Filters, ProjectType};
use std::sync::LazyLock;

use crate::vocabulary::{
    ECOSYSTEM_HINTS, LANGUAGE_CONTEXT_AFTER, LANGUAGE_CONTEXT_BEFORE, LANGUAGES, PROJECT_TYPES,
    TECHNICAL_TERMS,
};

/// Comparison subject patterns in priority order; only the first match counts.
const COMPARISON_PATTERNS: &[&str] = &[
    r"(\w+)\s+(?:vs|versus)\s+(\w+)",
    r"(\w+)\s+(?:and|with)\s+(\w+)",
    r"(\w+)\s+or\s+(\w+)",
    r"compare\s+(\w+)\s+(?:and|with|to)\s+(\w+)",
    r"between\s+(\w+)\s+and\s+(\w+)",
];

/// Compiles a pattern that is known to be valid.
fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("Query pattern {pattern:?} is invalid: {err}"),
    }
}

static SUBJECT_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| COMPARISON_PATTERNS.iter().map(|pattern| compile(pattern)).collect());

static VERSUS_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(vs|versus)\b"));

static COMPARE_CONJUNCTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"compare.*\b(and|with)\b"));

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile(r"[0-9]+"));

/// True when `needle` occurs in `haystack` with no word character on either side.
///
/// Unlike a regex `\b`, this also accepts tokens ending in punctuation such as
/// `c++` or `c#`.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(character: char) -> bool {
    character.is_alphanumeric() || character == '_'
}

/// Single-letter languages only count when the query talks about a language.
fn has_language_context(query: &str, letter: &str) -> bool {
    LANGUAGE_CONTEXT_AFTER
        .iter()
        .any(|word| contains_word(query, &format!("{letter} {word}")))
        || LANGUAGE_CONTEXT_BEFORE
            .iter()
            .any(|word| contains_word(query, &format!("{word} {letter}")))
}

/// Detects at most one programming language.
pub fn extract_language(query: &str) -> Option<String> {
    for (token, canonical) in LANGUAGES {
        if !contains_word(query, token) {
            continue;
        }
        if token.chars().count() == 1 {
            if *token == "c" && query.contains("c++") {
                return Some("c++".to_owned());
            }
            if !has_language_context(query, token) {
                continue;
            }
        }
        return Some((*canonical).to_owned());
    }

    ECOSYSTEM_HINTS
        .iter()
        .find(|(hint, _)| query.contains(hint))
        .map(|(_, language)| (*language).to_owned())
}

/// Detects the first project-type noun contained anywhere in the query.
pub fn extract_project_type(query: &str) -> Option<ProjectType> {
    PROJECT_TYPES
        .iter()
        .find(|(noun, _)| query.contains(noun))
        .map(|(_, project_type)| *project_type)
}

/// Time-window, activity and size filters.
pub fn extract_filters(query: &str) -> Filters {
    let mut filters = Filters::default();

    filters.days = if query.contains("this year") {
        Some(365)
    } else if query.contains("this month") {
        Some(30)
    } else if query.contains("this week") {
        Some(7)
    } else if query.contains("recent") {
        Some(30)
    } else {
        None
    };

    if query.contains("high activity") || query.contains("very active") {
        filters.min_stars = Some(100);
    } else if query.contains("active") {
        filters.min_stars = Some(10);
    }

    if query.contains("small") {
        filters.max_size = Some(1000);
    } else if query.contains("large") {
        filters.min_size = Some(10_000);
    }

    filters
}

/// First number in the query as a result limit within `1..=MAX_LIMIT`.
pub fn extract_limit(query: &str) -> Option<u32> {
    let digits = NUMBER_PATTERN.find(query)?.as_str();
    let limit = digits
        .parse::<u64>()
        .map_or(MAX_LIMIT, |value| value.min(u64::from(MAX_LIMIT)) as u32);
    Some(limit.max(1))
}

/// Whether the query is phrased as an explicit comparison.
pub fn has_comparison_phrase(query: &str) -> bool {
    VERSUS_PATTERN.is_match(query) || COMPARE_CONJUNCTION_PATTERN.is_match(query)
}

/// Two comparison subjects captured by the first matching pattern.
pub fn extract_comparison_subjects(query: &str) -> Option<[String; 2]> {
    SUBJECT_PATTERNS.iter().find_map(|pattern| {
        let captures = pattern.captures(query)?;
        let first = captures.get(1)?.as_str().to_owned();
        let second = captures.get(2)?.as_str().to_owned();
        Some([first, second])
    })
}

/// Number of distinct technical terms among the query words.
pub fn count_technical_terms<'query>(words: impl IntoIterator<Item = &'query str>) -> usize {
    let mut seen: Vec<&str> = Vec::new();
    for word in words {
        if TECHNICAL_TERMS.contains(&word) && !seen.contains(&word) {
            seen.push(word);
        }
    }
    seen.len()
}
