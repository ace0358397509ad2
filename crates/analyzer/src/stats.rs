//! Aggregate statistics across a user's repositories

use devfolio_collector::RepositoryWithLanguages;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Totals derived from a repository listing. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryStatistics {
    pub total_repos: usize,
    pub total_stars: u64,
    pub total_forks: u64,
    /// Bytes per language summed over every repository
    pub languages: BTreeMap<String, u64>,
    pub most_starred: Option<RepositoryWithLanguages>,
    /// Repository with the latest `updated_at`
    pub most_recent: Option<RepositoryWithLanguages>,
}

impl RepositoryStatistics {
    pub fn from_repositories(repos: &[RepositoryWithLanguages]) -> Self {
        let mut languages: BTreeMap<String, u64> = BTreeMap::new();
        for share in repos.iter().flat_map(|r| &r.languages) {
            *languages.entry(share.language.clone()).or_default() += share.bytes;
        }

        // ISO-8601 timestamps in one timezone order correctly as plain strings
        let most_recent = first_max_by(repos, |a, b| a.updated_at.cmp(&b.updated_at));
        let most_starred = first_max_by(repos, |a, b| a.stargazers_count.cmp(&b.stargazers_count));

        Self {
            total_repos: repos.len(),
            total_stars: repos.iter().map(|r| r.stargazers_count).sum(),
            total_forks: repos.iter().map(|r| r.forks_count).sum(),
            languages,
            most_starred: most_starred.cloned(),
            most_recent: most_recent.cloned(),
        }
    }
}

/// Maximum element; on ties the earliest one wins
fn first_max_by<T, F>(items: &[T], compare: F) -> Option<&T>
where
    F: Fn(&T, &T) -> Ordering,
{
    items.iter().fold(None, |best, item| match best {
        Some(current) if compare(item, current) != Ordering::Greater => Some(current),
        _ => Some(item),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{repo, share};

    #[test]
    fn test_empty_input() {
        let stats = RepositoryStatistics::from_repositories(&[]);

        assert_eq!(stats, RepositoryStatistics::default());
        assert_eq!(stats.total_repos, 0);
        assert!(stats.languages.is_empty());
        assert!(stats.most_starred.is_none());
        assert!(stats.most_recent.is_none());
    }

    #[test]
    fn test_sums_and_language_totals() {
        let mut a = repo("a", 4, "");
        a.repository.forks_count = 2;
        a.languages = vec![share("Rust", 900, 90.0), share("Shell", 100, 10.0)];

        let mut b = repo("b", 6, "");
        b.repository.forks_count = 1;
        b.languages = vec![share("Rust", 50, 50.0), share("Python", 50, 50.0)];

        let stats = RepositoryStatistics::from_repositories(&[a, b]);

        assert_eq!(stats.total_repos, 2);
        assert_eq!(stats.total_stars, 10);
        assert_eq!(stats.total_forks, 3);
        assert_eq!(stats.languages["Rust"], 950);
        assert_eq!(stats.languages["Shell"], 100);
        assert_eq!(stats.languages["Python"], 50);
        assert_eq!(stats.most_starred.unwrap().name, "b");
    }

    #[test]
    fn test_most_recent_by_timestamp_string() {
        let mut old = repo("old", 1, "");
        old.repository.updated_at = "2023-12-31T23:59:59Z".to_string();
        let mut new = repo("new", 0, "");
        new.repository.updated_at = "2024-01-02T08:00:00Z".to_string();

        let stats = RepositoryStatistics::from_repositories(&[old, new]);
        assert_eq!(stats.most_recent.unwrap().name, "new");
        assert_eq!(stats.most_starred.unwrap().name, "old");
    }

    #[test]
    fn test_ties_pick_first() {
        let stats = RepositoryStatistics::from_repositories(&[repo("first", 3, ""), repo("second", 3, "")]);

        assert_eq!(stats.most_starred.unwrap().name, "first");
        assert_eq!(stats.most_recent.unwrap().name, "first");
    }

    #[test]
    fn test_empty_serializes_with_nulls() {
        let value = serde_json::to_value(RepositoryStatistics::default()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "total_repos": 0,
                "total_stars": 0,
                "total_forks": 0,
                "languages": {},
                "most_starred": null,
                "most_recent": null
            })
        );
    }
}
