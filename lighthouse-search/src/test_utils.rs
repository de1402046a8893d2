//! Shared test doubles for the catalog stores and the similarity primitive.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::error::SearchError;
use crate::similarity::{Candidate, SimilarityPrimitive};
use crate::store::{AvailabilityStore, MetadataStore};
use crate::types::{CostAvailability, Metadata, ScoredMatch};

/// In-memory catalog implementing both store contracts.
#[derive(Default)]
pub struct MemoryStore {
    items: BTreeMap<String, (Metadata, CostAvailability)>,
    fail: AtomicBool,
}

impl MemoryStore {
    pub fn with_item(mut self, name: &str, fields: &[(&str, &str)], cost: f64) -> Self {
        let metadata = fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let availability = CostAvailability {
            cost,
            available: true,
        };
        self.items.insert(name.to_owned(), (metadata, availability));
        self
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), SearchError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(SearchError::Backend("store offline".into()))
        } else {
            Ok(())
        }
    }
}

impl MetadataStore for MemoryStore {
    fn all_names(&self) -> Result<Vec<String>, SearchError> {
        self.check()?;
        Ok(self.items.keys().cloned().collect())
    }

    fn get(&self, name: &str) -> Result<Option<Metadata>, SearchError> {
        self.check()?;
        Ok(self.items.get(name).map(|(metadata, _)| metadata.clone()))
    }
}

impl AvailabilityStore for MemoryStore {
    fn get(&self, name: &str) -> Result<Option<CostAvailability>, SearchError> {
        self.check()?;
        Ok(self.items.get(name).map(|(_, availability)| *availability))
    }
}

/// Scores 100 for a case-insensitive exact match, 90 when the text contains
/// the query, and drops everything else. Counts its invocations.
#[derive(Default)]
pub struct ContainsMatcher {
    calls: AtomicUsize,
}

impl ContainsMatcher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SimilarityPrimitive for ContainsMatcher {
    fn extract(
        &self,
        query: &str,
        candidates: &[Candidate],
        limit: usize,
    ) -> Result<Vec<ScoredMatch>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let query = query.to_lowercase();
        let mut matches: Vec<ScoredMatch> = candidates
            .iter()
            .filter_map(|candidate| {
                let text = candidate.text.to_lowercase();
                if text == query {
                    Some(ScoredMatch::new(candidate.key.clone(), 100.0))
                } else if !query.is_empty() && text.contains(&query) {
                    Some(ScoredMatch::new(candidate.key.clone(), 90.0))
                } else {
                    None
                }
            })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(limit);
        Ok(matches)
    }
}

/// Always fails.
pub struct FailingMatcher;

impl SimilarityPrimitive for FailingMatcher {
    fn extract(
        &self,
        _query: &str,
        _candidates: &[Candidate],
        _limit: usize,
    ) -> Result<Vec<ScoredMatch>, SearchError> {
        Err(SearchError::Backend("matcher exploded".into()))
    }
}

/// The two-item catalog used throughout the aggregator tests.
pub fn alice_and_bob() -> MemoryStore {
    MemoryStore::default()
        .with_item("alice", &[("title", "Alice in Wonderland")], 2.5)
        .with_item("bob", &[("title", "Bob the Builder")], 1.0)
}
