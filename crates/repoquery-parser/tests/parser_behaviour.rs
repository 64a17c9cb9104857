//! End-to-end behaviour of the rule-based parser on realistic questions
#![cfg_attr(
    test,
    allow(
        clippy::missing_panics_doc,
        clippy::tests_outside_test_module,
        reason = "Test allows"
    )
)]

use repoquery_core::{ParsedQuery, ProjectType, QueryIntent, SortKey};
use repoquery_parser::{QueryParser as _, RuleBasedParser, suggest, validate};

const EPSILON: f64 = 1e-9;

fn parse(query: &str) -> ParsedQuery {
    RuleBasedParser::new().parse_text(query)
}

#[test]
fn ranking_questions_are_detected() {
    for query in [
        "top 5 most starred Python projects",
        "show me the top 10 JavaScript frameworks",
        "best Python libraries",
        "most popular web frameworks",
        "5 most starred repositories",
    ] {
        let parsed = parse(query);
        assert_eq!(parsed.intent, QueryIntent::Ranking, "{query}");
        assert!(parsed.confidence >= 0.7 - EPSILON, "{query}");
    }
}

#[test]
fn ranking_parameters_are_extracted() {
    let parsed = parse("top 10 most starred Python web frameworks");
    assert_eq!(parsed.intent, QueryIntent::Ranking);
    assert_eq!(parsed.limit, 10);
    assert_eq!(parsed.language.as_deref(), Some("python"));
    assert_eq!(parsed.project_type, Some(ProjectType::Framework));
    assert_eq!(parsed.sort_by, SortKey::Stars);
}

#[test]
fn comparison_questions_are_detected() {
    for query in [
        "compare React vs Vue",
        "React versus Angular comparison",
        "difference between Django and Flask",
        "how does TensorFlow compare to PyTorch",
        "which is better Django or FastAPI",
    ] {
        let parsed = parse(query);
        assert_eq!(parsed.intent, QueryIntent::Comparison, "{query}");
        assert!(parsed.confidence >= 0.6 - EPSILON, "{query}");
    }
}

#[test]
fn comparison_subjects_are_kept_verbatim() {
    let parsed = parse("compare React vs Vue.js");
    assert_eq!(parsed.intent, QueryIntent::Comparison);
    assert_eq!(parsed.repositories.len(), 2);
    let lowered: Vec<String> = parsed.repositories.iter().map(|repo| repo.to_lowercase()).collect();
    assert!(lowered.contains(&"react".to_owned()));
    assert!(lowered.contains(&"vue".to_owned()));
}

#[test]
fn punctuation_does_not_break_comparisons() {
    let parsed = parse("compare React.js vs Vue.js!!!");
    assert_eq!(parsed.intent, QueryIntent::Comparison);
    assert_eq!(parsed.repositories.len(), 2);
}

#[test]
fn trending_questions_are_detected() {
    for query in [
        "trending Python projects",
        "hot JavaScript projects",
        "rising machine learning projects",
    ] {
        let parsed = parse(query);
        assert_eq!(parsed.intent, QueryIntent::Trending, "{query}");
        assert!(parsed.confidence >= 0.6 - EPSILON, "{query}");
        assert!(parsed.filters.days.is_some(), "{query}");
    }
}

#[test]
fn trending_window_comes_from_the_question() {
    let parsed = parse("trending Python projects this week");
    assert_eq!(parsed.intent, QueryIntent::Trending);
    assert_eq!(parsed.language.as_deref(), Some("python"));
    assert_eq!(parsed.filters.days, Some(7));
}

#[test]
fn everything_else_is_a_search() {
    for query in [
        "find machine learning libraries",
        "show me some Python projects",
        "search for web development tools",
        "any good data visualization packages",
    ] {
        assert_eq!(parse(query).intent, QueryIntent::Search, "{query}");
    }
}

#[test]
fn languages_and_ecosystems_resolve() {
    for (query, expected) in [
        ("Python web frameworks", "python"),
        ("Go microservices tools", "go"),
        ("Node.js packages", "javascript"),
        ("Django vs Flask", "python"),
        ("Cpp game engines", "c++"),
        ("TypeScript utilities", "typescript"),
        ("JS frameworks", "javascript"),
        ("TS libraries", "typescript"),
        ("CPP projects", "c++"),
        ("node packages", "javascript"),
    ] {
        assert_eq!(parse(query).language.as_deref(), Some(expected), "{query}");
    }
}

#[test]
fn alias_and_ecosystem_agree() {
    assert_eq!(parse("JS frameworks").language, parse("node packages").language);
}

#[test]
fn letter_c_inside_words_is_not_a_language() {
    assert_eq!(parse("recent projects").language, None);
    assert_eq!(parse("show me c++ game engines").language.as_deref(), Some("c++"));
}

#[test]
fn project_types_are_singular() {
    for (query, expected) in [
        ("Python web frameworks", ProjectType::Framework),
        ("JavaScript libraries", ProjectType::Library),
        ("development tools", ProjectType::Tool),
        ("useful packages", ProjectType::Package),
        ("browser extensions", ProjectType::Extension),
    ] {
        assert_eq!(parse(query).project_type, Some(expected), "{query}");
    }
}

#[test]
fn time_windows_are_extracted() {
    for (query, days) in [
        ("trending projects this year", 365),
        ("popular repositories this month", 30),
        ("hot projects this week", 7),
        ("recent JavaScript libraries", 30),
    ] {
        assert_eq!(parse(query).filters.days, Some(days), "{query}");
    }
}

#[test]
fn activity_levels_become_star_floors() {
    for (query, min_stars) in [
        ("high activity Python projects", 100),
        ("very active repositories", 100),
        ("active JavaScript libraries", 10),
    ] {
        assert_eq!(parse(query).filters.min_stars, Some(min_stars), "{query}");
    }
}

#[test]
fn clear_questions_validate() {
    for query in [
        "top 5 Python frameworks",
        "compare React vs Vue",
        "trending JavaScript projects",
    ] {
        assert!(validate(&parse(query)), "{query}");
    }
}

#[test]
fn empty_question_is_low_confidence() {
    let parsed = parse("");
    assert!(matches!(parsed.intent, QueryIntent::Search | QueryIntent::Unknown));
    assert!(parsed.confidence <= 0.5);
    assert_eq!(parsed.original_query, "");
}

#[test]
fn incomplete_comparison_asks_for_repositories() {
    let parsed = parse("compare React");
    assert_eq!(parsed.intent, QueryIntent::Comparison);
    assert!(!validate(&parsed));
    let suggestions = suggest(&parsed);
    assert!(!suggestions.is_empty());
    assert!(suggestions.iter().any(|suggestion| suggestion.to_lowercase().contains("repositories")));
}

#[test]
fn vague_question_still_parses() {
    let parsed = parse("show me some stuff");
    assert_eq!(parsed.intent, QueryIntent::Search);
    assert!(validate(&parsed));
}

#[test]
fn very_long_question_keeps_its_signal() {
    let long_query = "show me the top 5 most starred Python web development frameworks that are actively maintained and have good documentation and are suitable for building REST APIs and have good community support and are beginner friendly".repeat(3);
    let parsed = parse(&long_query);
    assert!(matches!(parsed.intent, QueryIntent::Ranking | QueryIntent::Search));
    assert_eq!(parsed.language.as_deref(), Some("python"));
    assert!((0.0..=1.0).contains(&parsed.confidence));
}

#[test]
fn case_does_not_matter() {
    let parsed = parse("TOP 5 PYTHON WEB FRAMEWORKS");
    assert_eq!(parsed.intent, QueryIntent::Ranking);
    assert_eq!(parsed.language.as_deref(), Some("python"));
    assert_eq!(parsed.project_type, Some(ProjectType::Framework));
    assert_eq!(parsed.original_query, "TOP 5 PYTHON WEB FRAMEWORKS");
}

#[test]
fn confidence_separates_clear_and_vague_questions() {
    for query in [
        "top 5 Python frameworks",
        "compare React vs Vue",
        "trending JavaScript projects",
    ] {
        assert!(parse(query).confidence >= 0.7 - EPSILON, "{query}");
    }
    for query in ["show me stuff", "find things", "what about projects"] {
        assert!(parse(query).confidence <= 0.61, "{query}");
    }
}

#[test]
fn adding_entities_never_lowers_confidence() {
    for (plain, enriched) in [
        ("top tools", "top python tools"),
        ("find parsers", "find rust parsers"),
        ("trending projects", "trending go projects"),
        ("best stuff", "best stuff libraries"),
        ("compare react vs vue", "compare react vs vue frameworks"),
    ] {
        assert!(
            parse(enriched).confidence >= parse(plain).confidence,
            "{plain} -> {enriched}"
        );
    }
}

#[test]
fn confidence_is_always_bounded() {
    for query in [
        "",
        "   ",
        "top top best most popular starred forked 50 python frameworks this year",
        "vs vs vs versus compare comparison difference better react and vue",
        "🚀 emoji only ✨",
        "!!!???",
        "top 18446744073709551616 repos",
    ] {
        let parsed = parse(query);
        assert!((0.0..=1.0).contains(&parsed.confidence), "{query}");
        assert!((1..=50).contains(&parsed.limit), "{query}");
        assert!(parsed.repositories.len() <= 2, "{query}");
    }
}

#[test]
fn parsing_is_idempotent() {
    let parser = RuleBasedParser::new();
    for query in ["top 10 rust cli tools", "compare django and flask", "hot projects"] {
        assert_eq!(parser.parse_text(query), parser.parse_text(query));
    }
}

#[tokio::test]
async fn trait_parse_matches_inherent_parse() {
    let parser = RuleBasedParser::new();
    let query = "trending Python projects this week";
    assert_eq!(parser.parse(query).await, parser.parse_text(query));
    assert_eq!(parser.name(), "rule-based");
}
