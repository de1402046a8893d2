//! Fuzzy index over one searchable field.
//!
//! A [`FuzzyIndex`] projects every catalog item onto a candidate string for
//! its field, scores a query against those candidates with the similarity
//! primitive, and caches the ranked matches per query string.

use std::sync::Arc;

use crate::cache::SearchCache;
use crate::error::SearchError;
use crate::similarity::{Candidate, SimilarityPrimitive};
use crate::store::MetadataStore;
use crate::types::{FieldKind, ScoredMatch, SearchSettings};

/// Searchable index for a single field, with its own result cache.
pub struct FuzzyIndex {
    kind: FieldKind,
    cache: SearchCache,
    matcher: Arc<dyn SimilarityPrimitive>,
    metadata: Arc<dyn MetadataStore>,
}

impl FuzzyIndex {
    /// Build an index for `field`. The reserved `name` field indexes item
    /// names; any other field indexes that metadata value.
    pub fn new(
        field: &str,
        cache_size: usize,
        matcher: Arc<dyn SimilarityPrimitive>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            kind: FieldKind::for_field(field),
            cache: SearchCache::new(cache_size),
            matcher,
            metadata,
        }
    }

    /// The field this index searches.
    pub fn field(&self) -> &str {
        self.kind.field()
    }

    /// How candidates are projected for this field.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// This index's result cache.
    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    /// Find the items whose field value best matches `query`.
    ///
    /// Returns cached matches unless `settings.force` is set. Otherwise the
    /// candidates are projected and scored on the blocking worker pool, and
    /// the fresh matches replace whatever was cached for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Backend`] if the metadata store or the
    /// similarity primitive fails, or the scoring task dies.
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
        settings: &SearchSettings,
    ) -> Result<Vec<ScoredMatch>, SearchError> {
        if !settings.force {
            if let Some(cached) = self.cache.get(query) {
                tracing::debug!(field = %self.kind, count = cached.len(), "field cache hit");
                return Ok(cached);
            }
        }

        let kind = self.kind.clone();
        let matcher = Arc::clone(&self.matcher);
        let metadata = Arc::clone(&self.metadata);
        let owned_query = query.to_owned();

        let matches = tokio::task::spawn_blocking(move || {
            let candidates = project_candidates(&kind, metadata.as_ref())?;
            matcher.extract(&owned_query, &candidates, max_results)
        })
        .await
        .map_err(|e| {
            SearchError::Backend(format!("field '{}': scoring task failed: {e}", self.kind))
        })??;

        tracing::debug!(
            field = %self.kind,
            count = matches.len(),
            forced = settings.force,
            "field computed matches"
        );

        if let Some(evicted) = self.cache.put(query, matches.clone()) {
            tracing::trace!(field = %self.kind, %evicted, "evicted cached query");
        }
        Ok(matches)
    }
}

/// Project the catalog onto candidate strings for one field kind.
///
/// Items without a value for a metadata field are not candidates.
fn project_candidates(
    kind: &FieldKind,
    metadata: &dyn MetadataStore,
) -> Result<Vec<Candidate>, SearchError> {
    let names = metadata.all_names()?;
    match kind {
        FieldKind::Name => Ok(names.into_iter().map(Candidate::named).collect()),
        FieldKind::Metadata(field) => {
            let mut candidates = Vec::with_capacity(names.len());
            for name in names {
                if let Some(text) = metadata.field_value(&name, field)? {
                    candidates.push(Candidate::new(name, text));
                }
            }
            Ok(candidates)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{alice_and_bob, ContainsMatcher, FailingMatcher, MemoryStore};

    fn index(field: &str, matcher: Arc<ContainsMatcher>, store: Arc<MemoryStore>) -> FuzzyIndex {
        FuzzyIndex::new(field, 10, matcher, store)
    }

    #[test]
    fn index_kind_follows_field() {
        let store = Arc::new(alice_and_bob());
        let matcher = Arc::new(ContainsMatcher::default());
        assert_eq!(
            index("name", Arc::clone(&matcher), Arc::clone(&store)).kind(),
            &FieldKind::Name
        );
        let title = index("title", matcher, store);
        assert_eq!(title.kind(), &FieldKind::Metadata("title".into()));
        assert_eq!(title.field(), "title");
    }

    #[tokio::test]
    async fn name_field_matches_item_names() {
        let matcher = Arc::new(ContainsMatcher::default());
        let idx = index("name", matcher, Arc::new(alice_and_bob()));
        let matches = idx
            .search("alice", 100, &SearchSettings::default())
            .await
            .expect("search");
        assert_eq!(matches, vec![ScoredMatch::new("alice", 100.0)]);
    }

    #[tokio::test]
    async fn metadata_field_matches_are_keyed_by_item_name() {
        let matcher = Arc::new(ContainsMatcher::default());
        let idx = index("title", matcher, Arc::new(alice_and_bob()));
        let matches = idx
            .search("builder", 100, &SearchSettings::default())
            .await
            .expect("search");
        assert_eq!(matches, vec![ScoredMatch::new("bob", 90.0)]);
    }

    #[tokio::test]
    async fn items_without_the_field_are_not_candidates() {
        let store = MemoryStore::default()
            .with_item("alice", &[("title", "Alice")], 1.0)
            .with_item("anon", &[], 1.0);
        let idx = index("title", Arc::new(ContainsMatcher::default()), Arc::new(store));
        let candidates = project_candidates(idx.kind(), idx.metadata.as_ref()).expect("project");
        assert_eq!(candidates, vec![Candidate::new("alice", "Alice")]);
    }

    #[tokio::test]
    async fn cache_hit_skips_recomputation() {
        let matcher = Arc::new(ContainsMatcher::default());
        let idx = index("name", Arc::clone(&matcher), Arc::new(alice_and_bob()));
        let settings = SearchSettings::default();

        let first = idx.search("alice", 100, &settings).await.expect("first");
        let second = idx.search("alice", 100, &settings).await.expect("second");

        assert_eq!(first, second);
        assert_eq!(matcher.calls(), 1);
        assert_eq!(idx.cache().queries(), vec!["alice"]);
    }

    #[tokio::test]
    async fn force_bypasses_read_but_refreshes_cache() {
        let matcher = Arc::new(ContainsMatcher::default());
        let idx = index("name", Arc::clone(&matcher), Arc::new(alice_and_bob()));

        // Seed a stale entry that a cache read would return.
        idx.cache().put("alice", vec![ScoredMatch::new("stale", 1.0)]);

        let fresh = idx
            .search("alice", 100, &SearchSettings::default().forced())
            .await
            .expect("search");

        assert_eq!(fresh, vec![ScoredMatch::new("alice", 100.0)]);
        assert_eq!(matcher.calls(), 1);
        assert_eq!(idx.cache().get("alice"), Some(fresh));
    }

    #[tokio::test]
    async fn max_results_limits_matches() {
        let store = MemoryStore::default()
            .with_item("ann", &[], 1.0)
            .with_item("anna", &[], 1.0)
            .with_item("annabel", &[], 1.0);
        let idx = index("name", Arc::new(ContainsMatcher::default()), Arc::new(store));
        let matches = idx
            .search("ann", 2, &SearchSettings::default())
            .await
            .expect("search");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].name, "ann");
    }

    #[tokio::test]
    async fn matcher_failure_is_backend_error_and_not_cached() {
        let idx = FuzzyIndex::new("name", 10, Arc::new(FailingMatcher), Arc::new(alice_and_bob()));
        let err = idx
            .search("alice", 100, &SearchSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Backend(_)));
        assert!(idx.cache().is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_backend_error() {
        let store = Arc::new(alice_and_bob());
        store.set_failing(true);
        let idx = index("title", Arc::new(ContainsMatcher::default()), store);
        let err = idx
            .search("alice", 100, &SearchSettings::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("store offline"));
    }

    #[tokio::test]
    async fn no_match_is_empty_and_cached() {
        let idx = index("name", Arc::new(ContainsMatcher::default()), Arc::new(alice_and_bob()));
        let matches = idx
            .search("zebra", 100, &SearchSettings::default())
            .await
            .expect("search");
        assert!(matches.is_empty());
        assert!(idx.cache().contains("zebra"));
    }
}
