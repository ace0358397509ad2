//! GitHub data shapes served by DevFolio

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// A repository as returned by `GET /users/{username}/repos`.
///
/// Timestamps stay as the ISO-8601 strings GitHub sends; they compare
/// correctly as strings and are never parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub clone_url: String,
    pub homepage: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub languages_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub size: u64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub pushed_at: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default = "default_visibility")]
    pub visibility: String,
}

fn default_visibility() -> String {
    "public".to_string()
}

impl Repository {
    pub fn has_description(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| !d.is_empty())
    }
}

/// One language's share of a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub language: String,
    pub bytes: u64,
    /// Percent of the repository's total bytes, one decimal place
    pub percentage: f64,
}

/// A repository together with its language breakdown, largest share first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryWithLanguages {
    #[serde(flatten)]
    pub repository: Repository,
    #[serde(default)]
    pub languages: Vec<LanguageShare>,
}

impl RepositoryWithLanguages {
    pub fn new(repository: Repository, languages: Vec<LanguageShare>) -> Self {
        Self {
            repository,
            languages,
        }
    }
}

impl Deref for RepositoryWithLanguages {
    type Target = Repository;

    fn deref(&self) -> &Repository {
        &self.repository
    }
}

/// The profile returned by `GET /users/{username}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    pub id: u64,
    pub avatar_url: String,
    pub html_url: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub public_gists: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub created_at: String,
    pub updated_at: String,
}

/// Sort orders accepted by the repository listing endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoSort {
    #[default]
    Updated,
    Created,
    Pushed,
    FullName,
}

impl RepoSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoSort::Updated => "updated",
            RepoSort::Created => "created",
            RepoSort::Pushed => "pushed",
            RepoSort::FullName => "full_name",
        }
    }
}

impl fmt::Display for RepoSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepoSort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "updated" => Ok(RepoSort::Updated),
            "created" => Ok(RepoSort::Created),
            "pushed" => Ok(RepoSort::Pushed),
            "full_name" => Ok(RepoSort::FullName),
            other => Err(format!(
                "unknown sort '{}', expected one of: updated, created, pushed, full_name",
                other
            )),
        }
    }
}
