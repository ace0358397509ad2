//! Pinned repositories over the GraphQL API

use crate::languages::language_breakdown;
use crate::models::{Repository, RepositoryWithLanguages};
use serde::Deserialize;

/// GitHub shows at most six pinned items on a profile
pub const MAX_PINNED: usize = 6;

pub(crate) const PINNED_QUERY: &str = r#"
query($login: String!) {
  user(login: $login) {
    pinnedItems(first: 6, types: REPOSITORY) {
      nodes {
        ... on Repository {
          databaseId
          name
          nameWithOwner
          description
          url
          homepageUrl
          stargazerCount
          forkCount
          watchers { totalCount }
          issues(states: OPEN) { totalCount }
          diskUsage
          isArchived
          isDisabled
          isFork
          visibility
          primaryLanguage { name }
          languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
            edges { size node { name } }
          }
          repositoryTopics(first: 20) { nodes { topic { name } } }
          createdAt
          updatedAt
          pushedAt
        }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PinnedData {
    pub user: Option<PinnedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PinnedUser {
    pub pinned_items: Nodes<PinnedNode>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Nodes<T> {
    // Nodes the viewer cannot see come back as null
    #[serde(default)]
    pub nodes: Vec<Option<T>>,
}

#[derive(Debug, Deserialize)]
struct TotalCount {
    #[serde(rename = "totalCount")]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LanguageEdges {
    #[serde(default)]
    edges: Vec<LanguageEdge>,
}

#[derive(Debug, Deserialize)]
struct LanguageEdge {
    size: u64,
    node: Named,
}

#[derive(Debug, Deserialize)]
struct TopicNode {
    topic: Named,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PinnedNode {
    database_id: Option<u64>,
    name: String,
    name_with_owner: String,
    description: Option<String>,
    url: String,
    homepage_url: Option<String>,
    stargazer_count: u64,
    fork_count: u64,
    watchers: TotalCount,
    issues: TotalCount,
    disk_usage: Option<u64>,
    is_archived: bool,
    is_disabled: bool,
    is_fork: bool,
    visibility: String,
    primary_language: Option<Named>,
    languages: Option<LanguageEdges>,
    repository_topics: Option<Nodes<TopicNode>>,
    created_at: String,
    updated_at: String,
    pushed_at: Option<String>,
}

impl PinnedNode {
    /// Reshape a GraphQL node into the REST-style repository record
    pub(crate) fn into_repository(self, api_base: &str) -> RepositoryWithLanguages {
        let languages = language_breakdown(
            self.languages
                .map(|l| l.edges)
                .unwrap_or_default()
                .into_iter()
                .map(|edge| (edge.node.name, edge.size)),
        );

        let topics = self
            .repository_topics
            .map(|t| t.nodes.into_iter().flatten().map(|n| n.topic.name).collect())
            .unwrap_or_default();

        let repository = Repository {
            id: self.database_id.unwrap_or_default(),
            languages_url: format!("{}/repos/{}/languages", api_base, self.name_with_owner),
            clone_url: format!("{}.git", self.url),
            name: self.name,
            full_name: self.name_with_owner,
            description: self.description,
            html_url: self.url,
            homepage: self.homepage_url.filter(|h| !h.is_empty()),
            language: self.primary_language.map(|l| l.name),
            stargazers_count: self.stargazer_count,
            watchers_count: self.watchers.total_count,
            forks_count: self.fork_count,
            open_issues_count: self.issues.total_count,
            size: self.disk_usage.unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            pushed_at: self.pushed_at.unwrap_or_default(),
            topics,
            archived: self.is_archived,
            disabled: self.is_disabled,
            fork: self.is_fork,
            visibility: self.visibility.to_lowercase(),
        };

        RepositoryWithLanguages::new(repository, languages)
    }
}

/// Pull the pinned repositories out of a decoded response body
pub(crate) fn pinned_repositories(
    response: GraphQlResponse<PinnedData>,
    api_base: &str,
) -> std::result::Result<Vec<RepositoryWithLanguages>, String> {
    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(messages.join("; "));
    }

    let user = response
        .data
        .and_then(|d| d.user)
        .ok_or_else(|| "response has no user".to_string())?;

    Ok(user
        .pinned_items
        .nodes
        .into_iter()
        .flatten()
        .take(MAX_PINNED)
        .map(|node| node.into_repository(api_base))
        .collect())
}
