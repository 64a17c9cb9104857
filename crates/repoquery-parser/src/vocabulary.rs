//! Fixed vocabularies used by the rule-based parser.
//!
//! Every list is ordered: where more than one entry can match, the earlier
//! entry wins.

use repoquery_core::ProjectType;

/// Words that signal a ranking question.
pub const RANKING_KEYWORDS: &[&str] = &["top", "best", "most", "popular", "starred", "forked"];

/// Words that signal a comparison question.
pub const COMPARISON_KEYWORDS: &[&str] = &[
    "vs",
    "versus",
    "compare",
    "comparison",
    "difference",
    "better",
];

/// Words that signal a trending question. "popular" is shared with ranking.
pub const TRENDING_KEYWORDS: &[&str] = &["trending", "hot", "rising", "popular", "recent"];

/// Words that signal a free search.
pub const SEARCH_KEYWORDS: &[&str] = &[
    "find",
    "show",
    "search",
    "get",
    "about",
    "projects",
    "repositories",
];

/// Language tokens and their canonical identifiers, in match priority.
///
/// The framework names at the end are recognized so that queries such as
/// "trending react projects" still carry an ecosystem.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("python", "python"),
    ("javascript", "javascript"),
    ("typescript", "typescript"),
    ("java", "java"),
    ("go", "go"),
    ("rust", "rust"),
    ("c++", "c++"),
    ("c#", "c#"),
    ("php", "php"),
    ("ruby", "ruby"),
    ("swift", "swift"),
    ("kotlin", "kotlin"),
    ("scala", "scala"),
    ("objective-c", "objective-c"),
    ("matlab", "matlab"),
    ("shell", "shell"),
    ("html", "html"),
    ("css", "css"),
    ("sql", "sql"),
    ("dart", "dart"),
    ("lua", "lua"),
    ("perl", "perl"),
    ("haskell", "haskell"),
    ("clojure", "clojure"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("cpp", "c++"),
    ("c", "c"),
    ("r", "r"),
    ("vue", "vue"),
    ("react", "react"),
    ("angular", "angular"),
];

/// Ecosystem words that imply a language when no language token is present.
/// Matched as plain substrings.
pub const ECOSYSTEM_HINTS: &[(&str, &str)] = &[
    ("node", "javascript"),
    ("npm", "javascript"),
    ("pip", "python"),
    ("django", "python"),
    ("flask", "python"),
    ("gem", "ruby"),
    ("rails", "ruby"),
    ("maven", "java"),
    ("gradle", "java"),
];

/// Phrases next to a single-letter language that confirm it names a language.
pub const LANGUAGE_CONTEXT_AFTER: &[&str] = &["language", "programming", "lang"];

/// Phrases before a single-letter language that confirm it names a language.
pub const LANGUAGE_CONTEXT_BEFORE: &[&str] = &["language", "programming", "written in"];

/// Project-type nouns matched as substrings, in match priority.
pub const PROJECT_TYPES: &[(&str, ProjectType)] = &[
    ("framework", ProjectType::Framework),
    ("libraries", ProjectType::Library),
    ("library", ProjectType::Library),
    ("tool", ProjectType::Tool),
    ("package", ProjectType::Package),
    ("module", ProjectType::Module),
    ("plugin", ProjectType::Plugin),
    ("extension", ProjectType::Extension),
    ("sdk", ProjectType::Sdk),
    ("api", ProjectType::Api),
    ("service", ProjectType::Service),
    ("application", ProjectType::Application),
    ("app", ProjectType::App),
];

/// Technical terms whose presence makes a free search more specific.
pub const TECHNICAL_TERMS: &[&str] = &[
    "microservice",
    "microservices",
    "rest",
    "web",
    "http",
    "database",
    "db",
    "orm",
    "nosql",
    "cache",
    "redis",
    "testing",
    "auth",
    "authentication",
    "security",
    "crypto",
    "machine",
    "learning",
    "ml",
    "ai",
    "neural",
    "deep",
    "docker",
    "kubernetes",
    "cloud",
    "aws",
    "gcp",
    "azure",
];

/// Resolves a language name or alias to its canonical identifier.
///
/// Unknown names are returned lowercased and trimmed; empty input yields `None`.
pub fn canonical_language(name: &str) -> Option<String> {
    let lowered = name.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    let canonical = LANGUAGES
        .iter()
        .chain(ECOSYSTEM_HINTS)
        .find(|(token, _)| *token == lowered)
        .map_or(lowered.clone(), |(_, canonical)| (*canonical).to_owned());
    Some(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_language_aliases() {
        assert_eq!(canonical_language("JS").as_deref(), Some("javascript"));
        assert_eq!(canonical_language(" ts ").as_deref(), Some("typescript"));
        assert_eq!(canonical_language("cpp").as_deref(), Some("c++"));
        assert_eq!(canonical_language("django").as_deref(), Some("python"));
        assert_eq!(canonical_language("Elixir").as_deref(), Some("elixir"));
        assert_eq!(canonical_language("  "), None);
    }

    #[test]
    fn test_popular_is_shared_between_ranking_and_trending() {
        assert!(RANKING_KEYWORDS.contains(&"popular"));
        assert!(TRENDING_KEYWORDS.contains(&"popular"));
    }

    #[test]
    fn test_longer_tokens_precede_their_prefixes() {
        let position = |needle: &str| {
            LANGUAGES
                .iter()
                .position(|(token, _)| *token == needle)
                .unwrap()
        };
        assert!(position("objective-c") < position("c"));
        assert!(position("c++") < position("c"));
        assert!(position("javascript") < position("js"));

        let type_position = |needle: &str| {
            PROJECT_TYPES
                .iter()
                .position(|(noun, _)| *noun == needle)
                .unwrap()
        };
        assert!(type_position("application") < type_position("app"));
        assert!(type_position("libraries") < type_position("library"));
    }
}
