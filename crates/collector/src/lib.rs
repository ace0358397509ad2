//! DevFolio GitHub Collector
//!
//! Fetches profile, repository, and language data from the GitHub REST and
//! GraphQL APIs.

pub mod github;
pub mod languages;
pub mod models;
mod pinned;

pub use github::{GithubApi, GithubClient};
pub use languages::language_breakdown;
pub use models::*;

use std::time::Duration;
use thiserror::Error;

/// Largest `per_page` GitHub accepts on list endpoints
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, CollectorError>;

/// Configuration for the GitHub client
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub github_token: Option<String>,
    pub user_agent: String,
    pub api_base: String,
    pub graphql_url: String,
    /// Upper bound on each upstream request, connect through body
    pub timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            github_token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            user_agent: "DevFolio/0.1 (https://github.com/devfolio/devfolio)".to_string(),
            api_base: "https://api.github.com".to_string(),
            graphql_url: "https://api.github.com/graphql".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}
