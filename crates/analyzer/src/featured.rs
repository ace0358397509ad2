//! Heuristic featured-repository selection

use devfolio_collector::RepositoryWithLanguages;

/// Most repositories shown as featured
pub const FEATURED_LIMIT: usize = 6;

/// Pick featured repositories when the profile has no pins.
///
/// Keeps repositories that have stars or a description, orders them by star
/// count (highest first, ties in input order), and takes the first six.
pub fn select_featured(repos: Vec<RepositoryWithLanguages>) -> Vec<RepositoryWithLanguages> {
    let mut candidates: Vec<_> = repos
        .into_iter()
        .filter(|r| r.stargazers_count > 0 || r.has_description())
        .collect();

    candidates.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    candidates.truncate(FEATURED_LIMIT);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::repo;

    fn stars(repos: &[RepositoryWithLanguages]) -> Vec<u64> {
        repos.iter().map(|r| r.stargazers_count).collect()
    }

    #[test]
    fn test_drops_unstarred_undescribed() {
        let picked = select_featured(vec![repo("a", 5, ""), repo("b", 0, "x"), repo("c", 0, "")]);

        let names: Vec<_> = picked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(stars(&picked), [5, 0]);
    }

    #[test]
    fn test_orders_by_stars_descending() {
        let picked = select_featured(vec![repo("a", 10, ""), repo("b", 0, "text"), repo("c", 3, "")]);
        assert_eq!(stars(&picked), [10, 3, 0]);
    }

    #[test]
    fn test_missing_description_counts_as_empty() {
        let mut undescribed = repo("a", 0, "");
        undescribed.repository.description = None;

        assert!(select_featured(vec![undescribed]).is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let picked = select_featured(vec![repo("first", 2, ""), repo("second", 2, ""), repo("top", 9, "")]);

        let names: Vec<_> = picked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["top", "first", "second"]);
    }

    #[test]
    fn test_never_more_than_six() {
        let repos = (1..=10).map(|i| repo(&format!("r{}", i), i, "")).collect();
        let picked = select_featured(repos);

        assert_eq!(picked.len(), FEATURED_LIMIT);
        assert_eq!(stars(&picked), [10, 9, 8, 7, 6, 5]);
    }
}
