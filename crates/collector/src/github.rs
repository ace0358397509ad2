//! GitHub API client

use crate::languages::language_breakdown;
use crate::models::{LanguageShare, RepoSort, Repository, RepositoryWithLanguages, UserProfile};
use crate::pinned::{pinned_repositories, GraphQlResponse, PinnedData, PINNED_QUERY};
use crate::{CollectorConfig, CollectorError, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

const GITHUB_API_VERSION: &str = "2022-11-28";

/// Upstream operations the aggregator depends on
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Fetch a user's public profile
    async fn fetch_user(&self, username: &str) -> Result<UserProfile>;

    /// Fetch a user's own repositories in the given order, forks removed
    async fn fetch_repositories(
        &self,
        username: &str,
        sort: RepoSort,
        limit: u32,
    ) -> Result<Vec<Repository>>;

    /// Fetch the language breakdown for `owner/name`
    async fn fetch_languages(&self, full_name: &str) -> Result<Vec<LanguageShare>>;

    /// Fetch pinned repositories. Best effort: any failure yields an empty list.
    async fn fetch_pinned(&self, username: &str) -> Vec<RepositoryWithLanguages>;
}

/// GitHub REST and GraphQL client
pub struct GithubClient {
    client: Client,
    config: CollectorConfig,
}

impl GithubClient {
    /// Create a new GitHub client
    pub fn new(config: CollectorConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);

        if let Some(ref token) = config.github_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn has_token(&self) -> bool {
        self.config.github_token.is_some()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!(url = url, "GET");
        let response = self.client.get(url).query(query).send().await?;
        self.check_rate_limit(&response)?;

        if !response.status().is_success() {
            return Err(CollectorError::Api(format!(
                "GitHub API error: {} for {}",
                response.status(),
                url
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CollectorError::Parse(format!("{}: {}", url, e)))
    }

    async fn query_pinned(&self, username: &str) -> Result<Vec<RepositoryWithLanguages>> {
        let body = serde_json::json!({
            "query": PINNED_QUERY,
            "variables": { "login": username },
        });

        let response = self
            .client
            .post(&self.config.graphql_url)
            .json(&body)
            .send()
            .await?;
        self.check_rate_limit(&response)?;

        if !response.status().is_success() {
            return Err(CollectorError::Api(format!(
                "GitHub GraphQL error: {}",
                response.status()
            )));
        }

        let decoded: GraphQlResponse<PinnedData> = response
            .json()
            .await
            .map_err(|e| CollectorError::Parse(e.to_string()))?;

        pinned_repositories(decoded, &self.config.api_base).map_err(CollectorError::Api)
    }

    fn check_rate_limit(&self, response: &Response) -> Result<()> {
        if response.status() == reqwest::StatusCode::FORBIDDEN {
            if let Some(remaining) = response.headers().get("x-ratelimit-remaining") {
                if remaining == "0" {
                    let reset = response
                        .headers()
                        .get("x-ratelimit-reset")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(60);

                    let now = Utc::now().timestamp() as u64;
                    let wait = reset.saturating_sub(now);

                    return Err(CollectorError::RateLimited(wait));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn fetch_user(&self, username: &str) -> Result<UserProfile> {
        info!(username = username, "Fetching GitHub profile");
        let url = format!("{}/users/{}", self.config.api_base, username);
        self.get_json(&url, &[]).await
    }

    async fn fetch_repositories(
        &self,
        username: &str,
        sort: RepoSort,
        limit: u32,
    ) -> Result<Vec<Repository>> {
        info!(username = username, sort = %sort, limit = limit, "Fetching repositories");
        let url = format!("{}/users/{}/repos", self.config.api_base, username);
        let query = [
            ("sort", sort.to_string()),
            ("per_page", limit.to_string()),
            ("type", "owner".to_string()),
        ];

        let repos: Vec<Repository> = self.get_json(&url, &query).await?;
        let total = repos.len();
        let owned: Vec<Repository> = repos.into_iter().filter(|r| !r.fork).collect();

        debug!(total = total, kept = owned.len(), "Dropped forked repositories");
        Ok(owned)
    }

    async fn fetch_languages(&self, full_name: &str) -> Result<Vec<LanguageShare>> {
        let url = format!("{}/repos/{}/languages", self.config.api_base, full_name);
        let bytes: BTreeMap<String, u64> = self.get_json(&url, &[]).await?;
        Ok(language_breakdown(bytes))
    }

    async fn fetch_pinned(&self, username: &str) -> Vec<RepositoryWithLanguages> {
        if !self.has_token() {
            debug!("No GitHub token configured, skipping pinned repositories");
            return Vec::new();
        }

        match self.query_pinned(username).await {
            Ok(repos) => {
                debug!(count = repos.len(), "Fetched pinned repositories");
                repos
            }
            Err(e) => {
                warn!(username = username, error = %e, "Failed to fetch pinned repositories");
                Vec::new()
            }
        }
    }
}
