//! Byte counts to percentage breakdowns

use crate::models::LanguageShare;

/// Convert raw per-language byte counts into percentage shares.
///
/// Each percentage is rounded to one decimal place. The result is sorted by
/// percentage, largest first; equal percentages keep their input order.
/// An empty report, or one whose bytes sum to zero, yields no shares.
pub fn language_breakdown<I, S>(bytes_by_language: I) -> Vec<LanguageShare>
where
    I: IntoIterator<Item = (S, u64)>,
    S: Into<String>,
{
    let counts: Vec<(String, u64)> = bytes_by_language
        .into_iter()
        .map(|(language, bytes)| (language.into(), bytes))
        .collect();

    let total: u64 = counts.iter().map(|(_, bytes)| *bytes).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<LanguageShare> = counts
        .into_iter()
        .map(|(language, bytes)| LanguageShare {
            language,
            bytes,
            percentage: round_one_decimal(bytes as f64 / total as f64 * 100.0),
        })
        .collect();

    shares.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    shares
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
