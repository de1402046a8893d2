//! Core search aggregator: concurrent per-field fan-out, weight, merge, rank.
//!
//! Searches every selected field index concurrently, weights each field's
//! scores, max-merges by item name, drops blocked names, sorts by weighted
//! score, truncates to the result cap, and enriches the survivors from the
//! catalog stores.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::index::FuzzyIndex;
use crate::similarity::SimilarityPrimitive;
use crate::store::{AvailabilityStore, MetadataStore};
use crate::types::{EnrichedResult, ScoredMatch, SearchSettings};

use super::merge::merge_by_name;
use super::scoring::{apply_weight, rank_and_truncate};

/// A field index together with its ranking weight.
struct WeightedIndex {
    index: FuzzyIndex,
    weight: f64,
}

/// Answers queries across every configured field index.
///
/// Owns one [`FuzzyIndex`] (and so one cache) per configured field. The
/// configuration is validated on construction and never changes afterwards.
pub struct Aggregator {
    config: Arc<SearchConfig>,
    indexes: BTreeMap<String, WeightedIndex>,
    metadata: Arc<dyn MetadataStore>,
    availability: Arc<dyn AvailabilityStore>,
}

impl Aggregator {
    /// Build an aggregator with one index per configured field.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` fails validation.
    pub fn new(
        config: SearchConfig,
        matcher: Arc<dyn SimilarityPrimitive>,
        metadata: Arc<dyn MetadataStore>,
        availability: Arc<dyn AvailabilityStore>,
    ) -> Result<Self, SearchError> {
        config.validate()?;

        let mut indexes = BTreeMap::new();
        for field in &config.fields {
            let weight = config.weight(field).ok_or_else(|| {
                SearchError::Config(format!("no weight configured for field '{field}'"))
            })?;
            let index = FuzzyIndex::new(
                field,
                config.cache_size,
                Arc::clone(&matcher),
                Arc::clone(&metadata),
            );
            indexes.insert(field.clone(), WeightedIndex { index, weight });
        }

        Ok(Self {
            config: Arc::new(config),
            indexes,
            metadata,
            availability,
        })
    }

    /// The validated configuration this aggregator was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The index for `field`, if that field is configured.
    pub fn index(&self, field: &str) -> Option<&FuzzyIndex> {
        self.indexes.get(field).map(|w| &w.index)
    }

    /// Search with the default field set and caching behaviour.
    ///
    /// # Errors
    ///
    /// Same as [`Aggregator::search`].
    pub async fn search_default(&self, query: &str) -> Result<Vec<EnrichedResult>, SearchError> {
        self.search(query, &SearchSettings::default()).await
    }

    /// Answer `query` with a ranked, deduplicated, enriched result list.
    ///
    /// # Pipeline
    ///
    /// 1. Resolve the field set from `settings` (or the configured default)
    /// 2. Fan out one index search per field concurrently
    /// 3. Wait for all of them, failing fast on the first error or timeout
    /// 4. Multiply each field's scores by its weight
    /// 5. Max-merge by item name, dropping blocked names
    /// 6. Sort by weighted score (descending, stable)
    /// 7. Truncate to `max_returned_results`
    /// 8. Attach each item's metadata and cost/availability
    ///
    /// # Errors
    ///
    /// - [`SearchError::Config`] if `settings.search_by` names an
    ///   unconfigured field or is empty
    /// - [`SearchError::Backend`] if any field search or enrichment read fails
    /// - [`SearchError::Timeout`] if the fan-out exceeds `timeout_seconds`
    ///
    /// Enrichment runs after truncation, so an item removed from the
    /// catalog between scoring and enrichment is dropped without a
    /// replacement: the answer can hold fewer than `max_returned_results`
    /// entries even when more matches ranked below the cut.
    pub async fn search(
        &self,
        query: &str,
        settings: &SearchSettings,
    ) -> Result<Vec<EnrichedResult>, SearchError> {
        let ranked = self.search_scored(query, settings).await?;
        self.enrich(ranked)
    }

    /// Run steps 1–7 of [`Aggregator::search`] and return the ranked names
    /// with their weighted scores, without enrichment.
    ///
    /// # Errors
    ///
    /// Same as [`Aggregator::search`], minus enrichment failures.
    pub async fn search_scored(
        &self,
        query: &str,
        settings: &SearchSettings,
    ) -> Result<Vec<ScoredMatch>, SearchError> {
        let selected = self.resolve_fields(settings)?;
        tracing::trace!(query, "aggregating search");

        // 1. Fan out to every selected field concurrently.
        let max_results = self.config.max_results_per_field;
        let searches = selected.iter().map(|weighted| async move {
            weighted
                .index
                .search(query, max_results, settings)
                .await
                .map_err(|err| {
                    tracing::warn!(
                        field = weighted.index.field(),
                        error = %err,
                        "field search failed"
                    );
                    err
                })
        });

        // 2. Barrier: every field completes, or the first failure wins.
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let per_field = match tokio::time::timeout(timeout, futures::future::try_join_all(searches))
            .await
        {
            Ok(outcome) => outcome?,
            Err(_elapsed) => {
                tracing::warn!(
                    timeout_secs = self.config.timeout_seconds,
                    fields = selected.len(),
                    "field fan-out timed out"
                );
                return Err(SearchError::Timeout(format!(
                    "field fan-out exceeded {}s limit",
                    self.config.timeout_seconds
                )));
            }
        };

        // 3. Weight each field's scores.
        let weighted = selected
            .iter()
            .zip(per_field)
            .map(|(w, matches)| {
                tracing::debug!(
                    field = w.index.field(),
                    count = matches.len(),
                    "field returned matches"
                );
                apply_weight(matches, w.weight)
            });

        // 4. Max-merge by name, filtering blocked names.
        let merged = merge_by_name(weighted, &self.config.blocked_names);

        // 5. Rank and truncate.
        Ok(rank_and_truncate(merged, self.config.max_returned_results))
    }

    /// Resolve the ordered, duplicate-free list of indexes to search.
    fn resolve_fields(
        &self,
        settings: &SearchSettings,
    ) -> Result<Vec<&WeightedIndex>, SearchError> {
        let requested = settings
            .search_by
            .as_deref()
            .unwrap_or(self.config.default_search_by.as_slice());
        if requested.is_empty() {
            return Err(SearchError::Config(
                "search_by must name at least one field".into(),
            ));
        }

        let mut seen = BTreeSet::new();
        let mut selected = Vec::with_capacity(requested.len());
        for field in requested {
            if !seen.insert(field.as_str()) {
                continue;
            }
            let weighted = self.indexes.get(field).ok_or_else(|| {
                SearchError::Config(format!("unknown search field '{field}'"))
            })?;
            selected.push(weighted);
        }
        Ok(selected)
    }

    /// Attach the current metadata and cost/availability to each name.
    ///
    /// Items removed from the catalog since they were matched are skipped.
    fn enrich(&self, ranked: Vec<ScoredMatch>) -> Result<Vec<EnrichedResult>, SearchError> {
        let mut results = Vec::with_capacity(ranked.len());
        for ScoredMatch { name, .. } in ranked {
            let Some(value) = self.metadata.get(&name)? else {
                tracing::debug!(%name, "matched item has no metadata, skipping");
                continue;
            };
            let Some(availability) = self.availability.get(&name)? else {
                tracing::debug!(%name, "matched item has no availability, skipping");
                continue;
            };
            results.push(EnrichedResult {
                name,
                value,
                cost: availability.cost,
                available: availability.available,
            });
        }
        Ok(results)
    }
}
