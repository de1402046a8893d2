//! Trait definition for the pluggable similarity primitive.
//!
//! The aggregator never scores strings itself. Each field index hands its
//! projected candidates to a [`SimilarityPrimitive`] and keeps whatever
//! ranked `(key, score)` pairs come back.

use crate::error::SearchError;
use crate::types::ScoredMatch;

/// A candidate string and the item name it projects back to.
///
/// For the name field `key` and `text` are the same string; for a
/// metadata field `text` is the field value and `key` is the owning item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Item name returned in matches.
    pub key: String,
    /// Text the query is scored against.
    pub text: String,
}

impl Candidate {
    /// Build a candidate whose key differs from its text.
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }

    /// Build a candidate scored against its own key.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            text: name.clone(),
            key: name,
        }
    }
}

/// A fuzzy string scorer.
///
/// Implementations must:
///
/// - return matches keyed by [`Candidate::key`], never by the raw text
/// - score in `[0, 100]`
/// - sort descending by score and return at most `limit` matches
/// - drop candidates below their own internal threshold (an empty result
///   is a valid answer, not an error)
///
/// Calls run on the blocking worker pool and may happen concurrently from
/// several field indexes, so implementations must be `Send + Sync`.
pub trait SimilarityPrimitive: Send + Sync {
    /// Score `query` against `candidates` and return the best `limit` matches.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Backend`] if scoring cannot be performed.
    fn extract(
        &self,
        query: &str,
        candidates: &[Candidate],
        limit: usize,
    ) -> Result<Vec<ScoredMatch>, SearchError>;
}
