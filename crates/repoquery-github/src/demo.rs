//! Demonstration repositories served when the GitHub API cannot be reached.
//!
//! The data is fixed and labelled as such in the logs; it only keeps the
//! tool usable offline.

use chrono::{DateTime, Utc};
use repoquery_core::Repository;
use repoquery_core::repository::RepositoryOwner;

/// One demonstration record.
struct DemoRepository {
    owner: &'static str,
    name: &'static str,
    description: &'static str,
    stars: u64,
    forks: u64,
    language: &'static str,
    updated_at: &'static str,
}

const PYTHON: &[DemoRepository] = &[
    DemoRepository {
        owner: "django",
        name: "django",
        description: "The web framework for perfectionists with deadlines.",
        stars: 78_234,
        forks: 31_876,
        language: "Python",
        updated_at: "2024-01-15T12:30:00Z",
    },
    DemoRepository {
        owner: "pallets",
        name: "flask",
        description: "The Python micro framework for building web applications.",
        stars: 66_847,
        forks: 16_234,
        language: "Python",
        updated_at: "2024-01-14T08:45:00Z",
    },
    DemoRepository {
        owner: "tiangolo",
        name: "fastapi",
        description: "FastAPI framework, high performance, easy to learn, fast to code, ready for production",
        stars: 67_123,
        forks: 5_634,
        language: "Python",
        updated_at: "2024-01-16T14:20:00Z",
    },
];

const JAVASCRIPT: &[DemoRepository] = &[
    DemoRepository {
        owner: "facebook",
        name: "react",
        description: "The library for web and native user interfaces",
        stars: 218_234,
        forks: 44_876,
        language: "JavaScript",
        updated_at: "2024-01-16T10:15:00Z",
    },
    DemoRepository {
        owner: "vuejs",
        name: "vue",
        description: "Vue.js is a progressive, incrementally-adoptable JavaScript framework for building UI on the web.",
        stars: 206_487,
        forks: 33_645,
        language: "JavaScript",
        updated_at: "2024-01-15T16:30:00Z",
    },
    DemoRepository {
        owner: "angular",
        name: "angular",
        description: "The modern web developer's platform",
        stars: 93_456,
        forks: 24_789,
        language: "TypeScript",
        updated_at: "2024-01-16T11:45:00Z",
    },
];

fn to_repository(demo: &DemoRepository) -> Repository {
    let full_name = format!("{}/{}", demo.owner, demo.name);
    Repository {
        name: demo.name.to_owned(),
        html_url: format!("https://github.com/{full_name}"),
        full_name,
        owner: RepositoryOwner {
            login: demo.owner.to_owned(),
        },
        description: Some(demo.description.to_owned()),
        stars: demo.stars,
        forks: demo.forks,
        language: Some(demo.language.to_owned()),
        updated_at: demo.updated_at.parse::<DateTime<Utc>>().ok(),
        ..Repository::default()
    }
}

fn generic(language: Option<&str>, query: &str) -> Vec<Repository> {
    let language = language.unwrap_or("Multiple");
    let entries = [
        (
            "user",
            "awesome-project",
            format!("An awesome project related to {query}"),
            15_234,
            3_456,
            "2024-01-15T12:00:00Z",
        ),
        (
            "demo",
            "demo-repo",
            format!("Demo repository for {query} examples"),
            8_765,
            1_234,
            "2024-01-14T09:30:00Z",
        ),
    ];

    entries
        .into_iter()
        .map(|(owner, name, description, stars, forks, updated_at)| {
            let full_name = format!("{owner}/{name}");
            Repository {
                name: name.to_owned(),
                html_url: format!("https://github.com/{full_name}"),
                full_name,
                owner: RepositoryOwner {
                    login: owner.to_owned(),
                },
                description: Some(description),
                stars,
                forks,
                language: Some(language.to_owned()),
                updated_at: updated_at.parse::<DateTime<Utc>>().ok(),
                ..Repository::default()
            }
        })
        .collect()
}

/// Demonstration results for a search on `query` in `language`.
#[must_use]
pub fn demo_repositories(language: Option<&str>, query: &str) -> Vec<Repository> {
    match language.map(str::to_lowercase).as_deref() {
        Some("python") => PYTHON.iter().map(to_repository).collect(),
        Some("javascript") => JAVASCRIPT.iter().map(to_repository).collect(),
        _ => generic(language, query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_demo_set() {
        let repos = demo_repositories(Some("Python"), "web");
        let names: Vec<String> = repos.iter().map(Repository::display_name).collect();
        assert_eq!(names, vec!["django/django", "pallets/flask", "tiangolo/fastapi"]);
        assert!(repos.iter().all(|repo| repo.updated_at.is_some()));
    }

    #[test]
    fn test_javascript_demo_set() {
        let repos = demo_repositories(Some("javascript"), "ui");
        assert_eq!(repos.len(), 3);
        assert_eq!(repos[0].html_url, "https://github.com/facebook/react");
    }

    #[test]
    fn test_generic_demo_mentions_query() {
        let repos = demo_repositories(Some("rust"), "parsers");
        assert_eq!(repos.len(), 2);
        assert_eq!(
            repos[0].description.as_deref(),
            Some("An awesome project related to parsers")
        );
        assert_eq!(repos[0].language.as_deref(), Some("rust"));

        let repos = demo_repositories(None, "anything");
        assert_eq!(repos[1].language.as_deref(), Some("Multiple"));
    }
}
