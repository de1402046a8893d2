//! Field weighting and ranking.
//!
//! Every score coming out of a field index is multiplied by that field's
//! weight. The weighted score is not clamped back to `[0, 100]`; it only
//! exists to rank items across fields.

use crate::types::ScoredMatch;

/// Multiply every score in `matches` by `weight`.
pub fn apply_weight(mut matches: Vec<ScoredMatch>, weight: f64) -> Vec<ScoredMatch> {
    for m in &mut matches {
        m.score *= weight;
    }
    matches
}

/// Sort by score, descending. Equal scores keep their current order.
pub fn rank(results: &mut [ScoredMatch]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Rank `results` and keep at most `cap` of them.
///
/// When fewer than `cap` results exist all of them are kept.
pub fn rank_and_truncate(mut results: Vec<ScoredMatch>, cap: usize) -> Vec<ScoredMatch> {
    rank(&mut results);
    results.truncate(cap);
    results
}
