//! Fetch-or-cache orchestration over the GitHub collector

use crate::featured::{select_featured, FEATURED_LIMIT};
use crate::stats::RepositoryStatistics;
use crate::Result;
use devfolio_collector::{
    GithubApi, RepoSort, Repository, RepositoryWithLanguages, UserProfile, MAX_PAGE_SIZE,
};
use devfolio_database::Database;
use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const USER_INFO_KEY: &str = "user_info";
pub const PINNED_KEY: &str = "featured_pinned";

/// How many recently updated repositories the featured heuristic looks at
const FEATURED_CANDIDATES: u32 = 20;
/// How many repositories statistics are computed over
const STATS_SAMPLE: u32 = 100;

/// Cache key for a repository listing. Each (limit, sort) pair gets its own slot.
pub fn repositories_key(limit: u32, sort: RepoSort) -> String {
    format!("repos_{}_{}", limit, sort)
}

/// Settings for the aggregator
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// The single GitHub account this service describes
    pub username: String,
    pub cache_ttl: Duration,
    /// Upper bound on in-flight language requests per listing
    pub language_concurrency: usize,
}

impl AggregatorConfig {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            cache_ttl: Duration::from_secs(60 * 60),
            language_concurrency: 8,
        }
    }
}

/// Serves GitHub-derived views, reading through the response cache.
///
/// Every public operation degrades instead of failing: upstream or cache
/// errors are logged and an empty or absent result is returned.
pub struct Aggregator {
    db: Database,
    github: Arc<dyn GithubApi>,
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(db: Database, github: Arc<dyn GithubApi>, config: AggregatorConfig) -> Self {
        Self { db, github, config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// The configured user's profile
    pub async fn user_info(&self) -> Option<UserProfile> {
        if let Some(user) = self.cached(USER_INFO_KEY).await {
            return Some(user);
        }

        match self.github.fetch_user(&self.config.username).await {
            Ok(user) => {
                self.store(USER_INFO_KEY, &user).await;
                Some(user)
            }
            Err(e) => {
                error!(username = %self.config.username, error = %e, "Failed to fetch GitHub user");
                None
            }
        }
    }

    /// Owned, non-fork repositories with their language breakdowns
    pub async fn repositories(&self, limit: u32, sort: RepoSort) -> Vec<RepositoryWithLanguages> {
        let key = repositories_key(limit, sort);
        if let Some(repos) = self.cached(&key).await {
            return repos;
        }

        match self.fetch_repositories(limit, sort).await {
            Ok(repos) => {
                self.store(&key, &repos).await;
                repos
            }
            Err(e) => {
                error!(limit = limit, sort = %sort, error = %e, "Failed to fetch repositories");
                Vec::new()
            }
        }
    }

    /// Up to six showcase repositories: the profile's pins if it has any,
    /// otherwise the best-starred recently updated ones
    pub async fn featured(&self) -> Vec<RepositoryWithLanguages> {
        if let Some(pinned) = self.cached::<Vec<RepositoryWithLanguages>>(PINNED_KEY).await {
            if !pinned.is_empty() {
                return pinned;
            }
        }

        let mut pinned = self.github.fetch_pinned(&self.config.username).await;
        if !pinned.is_empty() {
            pinned.truncate(FEATURED_LIMIT);
            self.store(PINNED_KEY, &pinned).await;
            return pinned;
        }

        debug!("No pinned repositories, selecting featured by stars");
        select_featured(self.repositories(FEATURED_CANDIDATES, RepoSort::Updated).await)
    }

    /// Totals across the most recently updated repositories
    pub async fn stats(&self) -> RepositoryStatistics {
        let repos = self.repositories(STATS_SAMPLE, RepoSort::Updated).await;
        RepositoryStatistics::from_repositories(&repos)
    }

    async fn fetch_repositories(
        &self,
        limit: u32,
        sort: RepoSort,
    ) -> Result<Vec<RepositoryWithLanguages>> {
        let repos = self
            .github
            .fetch_repositories(&self.config.username, sort, limit.min(MAX_PAGE_SIZE))
            .await?;

        let repos = self.attach_languages(repos).await;
        info!(count = repos.len(), sort = %sort, "Fetched repositories with languages");
        Ok(repos)
    }

    /// Look up each repository's languages concurrently, keeping listing order.
    /// A failed lookup leaves that repository with an empty breakdown.
    async fn attach_languages(&self, repos: Vec<Repository>) -> Vec<RepositoryWithLanguages> {
        let github = &self.github;

        stream::iter(repos.into_iter().filter(|r| !r.fork))
            .map(|repo| async move {
                let languages = match github.fetch_languages(&repo.full_name).await {
                    Ok(languages) => languages,
                    Err(e) => {
                        warn!(repo = %repo.full_name, error = %e, "Failed to fetch languages");
                        Vec::new()
                    }
                };
                RepositoryWithLanguages::new(repo, languages)
            })
            .buffered(self.config.language_concurrency.max(1))
            .collect()
            .await
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.read_cache(key).await {
            Ok(Some(value)) => {
                debug!(key = key, "Cache hit");
                Some(value)
            }
            Ok(None) => {
                debug!(key = key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key = key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    async fn read_cache<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.db.cache_get(key).await? {
            Some(payload) => Ok(Some(serde_json::from_value(payload)?)),
            None => Ok(None),
        }
    }

    async fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.db.cache_put(key, value, self.config.cache_ttl).await {
            warn!(key = key, error = %e, "Cache write failed");
        }
    }
}
