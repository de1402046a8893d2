//! Search configuration with the catalog's default field layout.
//!
//! [`SearchConfig`] decides which field indexes exist, how each field is
//! weighted in the merged ranking, how large each index's cache is, and
//! which names are never returned. It is validated once and then shared
//! read-only by the aggregator and every index.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::NAME_FIELD;

/// Configuration for the search aggregator.
///
/// Use [`Default::default()`] for the catalog defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Searchable fields. One index is built per entry.
    pub fields: Vec<String>,
    /// Fields searched when a query does not choose its own, in order.
    pub default_search_by: Vec<String>,
    /// Multiplier applied to every score coming from a field.
    pub weights: BTreeMap<String, f64>,
    /// Maximum number of results returned per query after ranking.
    pub max_returned_results: usize,
    /// Maximum number of matches requested from each field index.
    pub max_results_per_field: usize,
    /// Number of distinct queries each field index keeps cached.
    pub cache_size: usize,
    /// Names that are never returned, whatever their score.
    pub blocked_names: BTreeSet<String>,
    /// Upper bound on the whole per-field fan-out, in seconds.
    pub timeout_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let fields: Vec<String> = ["title", "description", "author", NAME_FIELD]
            .into_iter()
            .map(str::to_owned)
            .collect();
        let weights = [
            (NAME_FIELD, 1.5),
            ("title", 1.25),
            ("description", 1.0),
            ("author", 1.25),
        ]
        .into_iter()
        .map(|(field, weight)| (field.to_owned(), weight))
        .collect();

        Self {
            default_search_by: fields.clone(),
            fields,
            weights,
            max_returned_results: 25,
            max_results_per_field: 100,
            cache_size: 1000,
            blocked_names: BTreeSet::from(["socialengineering".to_owned()]),
            timeout_seconds: 10,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `fields` must be non-empty and free of duplicates
    /// - every field needs a positive, finite weight
    /// - `default_search_by` must be non-empty and name only configured fields
    /// - `max_returned_results`, `max_results_per_field`, `cache_size` and
    ///   `timeout_seconds` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.fields.is_empty() {
            return Err(SearchError::Config(
                "at least one search field must be configured".into(),
            ));
        }
        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.as_str()) {
                return Err(SearchError::Config(format!(
                    "search field '{field}' configured more than once"
                )));
            }
            match self.weights.get(field) {
                Some(weight) if weight.is_finite() && *weight > 0.0 => {}
                Some(_) => {
                    return Err(SearchError::Config(format!(
                        "weight for field '{field}' must be a positive number"
                    )))
                }
                None => {
                    return Err(SearchError::Config(format!(
                        "no weight configured for field '{field}'"
                    )))
                }
            }
        }
        if self.default_search_by.is_empty() {
            return Err(SearchError::Config(
                "default_search_by must name at least one field".into(),
            ));
        }
        if let Some(unknown) = self
            .default_search_by
            .iter()
            .find(|field| !seen.contains(field.as_str()))
        {
            return Err(SearchError::Config(format!(
                "default_search_by names unconfigured field '{unknown}'"
            )));
        }
        if self.max_returned_results == 0 {
            return Err(SearchError::Config(
                "max_returned_results must be greater than 0".into(),
            ));
        }
        if self.max_results_per_field == 0 {
            return Err(SearchError::Config(
                "max_results_per_field must be greater than 0".into(),
            ));
        }
        if self.cache_size == 0 {
            return Err(SearchError::Config(
                "cache_size must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Weight for `field`, or `None` if the field is not configured.
    pub fn weight(&self, field: &str) -> Option<f64> {
        self.weights.get(field).copied()
    }

    /// Returns `true` if `name` must never appear in results.
    pub fn is_blocked(&self, name: &str) -> bool {
        self.blocked_names.contains(name)
    }
}
