//! Repository builders shared by the unit tests

use devfolio_collector::{LanguageShare, Repository, RepositoryWithLanguages};

pub(crate) fn bare_repo(name: &str, stars: u64, description: &str) -> Repository {
    Repository {
        id: stars,
        name: name.to_string(),
        full_name: format!("octocat/{}", name),
        description: Some(description.to_string()),
        html_url: format!("https://github.com/octocat/{}", name),
        clone_url: format!("https://github.com/octocat/{}.git", name),
        homepage: None,
        language: None,
        languages_url: String::new(),
        stargazers_count: stars,
        watchers_count: stars,
        forks_count: 0,
        open_issues_count: 0,
        size: 0,
        created_at: "2020-01-01T00:00:00Z".to_string(),
        updated_at: "2024-01-01T00:00:00Z".to_string(),
        pushed_at: "2024-01-01T00:00:00Z".to_string(),
        topics: Vec::new(),
        archived: false,
        disabled: false,
        fork: false,
        visibility: "public".to_string(),
    }
}

pub(crate) fn repo(name: &str, stars: u64, description: &str) -> RepositoryWithLanguages {
    RepositoryWithLanguages::new(bare_repo(name, stars, description), Vec::new())
}

pub(crate) fn share(language: &str, bytes: u64, percentage: f64) -> LanguageShare {
    LanguageShare {
        language: language.to_string(),
        bytes,
        percentage,
    }
}
