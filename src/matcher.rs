//! Character-level similarity scoring on top of `similar`.

use lighthouse_search::{Candidate, ScoredMatch, SearchError, SimilarityPrimitive};
use similar::TextDiff;

/// Penalty applied to a best-window (partial) match relative to a full match.
const PARTIAL_SCALE: f64 = 0.9;

/// Ratio-based fuzzy matcher.
///
/// Each candidate scores the better of two measures, both case-insensitive:
///
/// - the full ratio of query against candidate text
/// - the best ratio of the shorter string against every equal-length window
///   of the longer one, scaled by 0.9
///
/// Scores are whole numbers in `[0, 100]`.
#[derive(Debug, Clone)]
pub struct RatioMatcher {
    score_cutoff: f64,
}

impl RatioMatcher {
    /// Create a matcher that drops candidates scoring below `score_cutoff`.
    pub fn new(score_cutoff: f64) -> Self {
        Self { score_cutoff }
    }

    /// The minimum score a candidate needs to be returned.
    pub fn score_cutoff(&self) -> f64 {
        self.score_cutoff
    }

    /// Score `query` against `text`.
    pub fn score(&self, query: &str, text: &str) -> f64 {
        let query = query.to_lowercase();
        let text = text.to_lowercase();
        let full = ratio(&query, &text);
        let partial = partial_ratio(&query, &text) * PARTIAL_SCALE;
        (full.max(partial) * 100.0).round().clamp(0.0, 100.0)
    }
}

impl Default for RatioMatcher {
    fn default() -> Self {
        Self::new(50.0)
    }
}

impl SimilarityPrimitive for RatioMatcher {
    fn extract(
        &self,
        query: &str,
        candidates: &[Candidate],
        limit: usize,
    ) -> Result<Vec<ScoredMatch>, SearchError> {
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut matches: Vec<ScoredMatch> = candidates
            .iter()
            .filter_map(|candidate| {
                let score = self.score(query, &candidate.text);
                (score >= self.score_cutoff).then(|| ScoredMatch::new(candidate.key.clone(), score))
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(limit);
        Ok(matches)
    }
}

fn ratio(a: &str, b: &str) -> f64 {
    f64::from(TextDiff::from_chars(a, b).ratio())
}

/// Best ratio of the shorter string against equal-length windows of the longer.
///
/// Zero when both strings have the same length or the shorter one is empty.
fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a, b_chars)
    } else {
        (b, a_chars)
    };
    let short_len = short.chars().count();
    if short_len == 0 || short_len == long.len() {
        return 0.0;
    }

    let mut best = 0.0_f64;
    for window in long.windows(short_len) {
        let window: String = window.iter().collect();
        best = best.max(ratio(short, &window));
        if best >= 1.0 {
            break;
        }
    }
    best
}
