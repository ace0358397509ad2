//! DevFolio Aggregator
//!
//! Serves profile, repository, featured, and statistics views over the
//! GitHub collector, caching upstream responses in the database.

mod aggregator;
mod featured;
mod stats;

#[cfg(test)]
mod fixtures;

pub use aggregator::{repositories_key, Aggregator, AggregatorConfig, PINNED_KEY, USER_INFO_KEY};
pub use featured::{select_featured, FEATURED_LIMIT};
pub use stats::RepositoryStatistics;

use thiserror::Error;

/// Failures inside the aggregator. None of these reach callers of the public
/// operations; they are logged and the operation degrades to an empty result.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Cache unavailable: {0}")]
    Cache(#[from] devfolio_database::DatabaseError),

    #[error("Upstream unavailable: {0}")]
    Upstream(#[from] devfolio_collector::CollectorError),

    #[error("Cached payload has an unexpected shape: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
