use std::collections::HashSet;

use super::rules::{InsightCandidate, InsightCategory};

/// Maximum insights returned.
pub const MAX_INSIGHTS: usize = 5;

/// Per-category quota filled before backfilling.
const BUCKETS: [(InsightCategory, usize); 3] = [
    (InsightCategory::Issue, 2),
    (InsightCategory::Optimization, 2),
    (InsightCategory::Positive, 1),
];

/// Rank candidates and pick the final list.
///
/// Candidates are ordered by (category weight, severity), highest first, with
/// the original order kept for ties, then deduplicated by exact text. The
/// list takes up to two issues, two optimizations and one positive, then
/// backfills from the remaining ranked candidates.
pub fn rank_insights(candidates: Vec<InsightCandidate>) -> Vec<InsightCandidate> {
    let mut ranked = candidates;
    ranked.sort_by(|a, b| b.rank_key().cmp(&a.rank_key()));

    let mut seen_text = HashSet::new();
    ranked.retain(|c| seen_text.insert(c.text.clone()));

    let mut picked: Vec<usize> = Vec::with_capacity(MAX_INSIGHTS);
    for (category, quota) in BUCKETS {
        picked.extend(
            ranked
                .iter()
                .enumerate()
                .filter(|(_, c)| c.category == category)
                .map(|(i, _)| i)
                .take(quota),
        );
    }

    for i in 0..ranked.len() {
        if picked.len() >= MAX_INSIGHTS {
            break;
        }
        if !picked.contains(&i) {
            picked.push(i);
        }
    }
    picked.truncate(MAX_INSIGHTS);

    picked.into_iter().map(|i| ranked[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn candidate(text: &str, category: InsightCategory, severity: u8) -> InsightCandidate {
        InsightCandidate {
            rule: text.to_lowercase().replace(' ', "_"),
            text: text.to_string(),
            severity,
            category,
        }
    }

    fn texts(list: &[InsightCandidate]) -> Vec<&str> {
        list.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_category_beats_severity() {
        let out = rank_insights(vec![
            candidate("Pos", InsightCategory::Positive, 10),
            candidate("Opt", InsightCategory::Optimization, 1),
            candidate("Issue", InsightCategory::Issue, 1),
        ]);
        assert_eq!(texts(&out), vec!["Issue", "Opt", "Pos"]);
    }

    #[test]
    fn test_bucket_fill_keeps_each_category() {
        let out = rank_insights(vec![
            candidate("I1", InsightCategory::Issue, 10),
            candidate("I2", InsightCategory::Issue, 9),
            candidate("I3", InsightCategory::Issue, 8),
            candidate("I4", InsightCategory::Issue, 7),
            candidate("O1", InsightCategory::Optimization, 6),
            candidate("P1", InsightCategory::Positive, 8),
        ]);
        assert_eq!(texts(&out), vec!["I1", "I2", "O1", "P1", "I3"]);
    }

    #[test]
    fn test_backfill_in_rank_order() {
        let out = rank_insights(vec![
            candidate("O1", InsightCategory::Optimization, 5),
            candidate("O2", InsightCategory::Optimization, 4),
            candidate("O3", InsightCategory::Optimization, 3),
            candidate("P1", InsightCategory::Positive, 8),
            candidate("P2", InsightCategory::Positive, 7),
            candidate("P3", InsightCategory::Positive, 6),
        ]);
        assert_eq!(texts(&out), vec!["O1", "O2", "P1", "O3", "P2"]);
    }

    #[test]
    fn test_duplicate_text_removed() {
        let out = rank_insights(vec![
            candidate("Same", InsightCategory::Issue, 6),
            candidate("Same", InsightCategory::Issue, 9),
            candidate("Other", InsightCategory::Positive, 2),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].severity, 9);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let out = rank_insights(vec![
            candidate("First", InsightCategory::Issue, 7),
            candidate("Second", InsightCategory::Issue, 7),
        ]);
        assert_eq!(texts(&out), vec!["First", "Second"]);
    }

    #[test]
    fn test_empty_and_short_lists() {
        assert!(rank_insights(vec![]).is_empty());
        let out = rank_insights(vec![candidate("Only", InsightCategory::Positive, 1)]);
        assert_eq!(out.len(), 1);
    }
}
