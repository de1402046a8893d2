//! Core types for fuzzy matches, per-query settings, and enriched results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The reserved field whose candidates are the item names themselves.
pub const NAME_FIELD: &str = "name";

/// An item's metadata record: field name to field value.
pub type Metadata = BTreeMap<String, String>;

/// A single fuzzy match keyed by item name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    /// The item name the match resolves to (never the raw field text).
    pub name: String,
    /// Similarity score. In `[0, 100]` as produced by the similarity
    /// primitive; unbounded once a field weight has been applied.
    pub score: f64,
}

impl ScoredMatch {
    /// Build a match from a name and score.
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Cost and availability snapshot for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostAvailability {
    /// Cost to obtain the item.
    pub cost: f64,
    /// Whether the item can currently be obtained.
    pub available: bool,
}

/// One entry of an aggregated answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedResult {
    /// The item name.
    pub name: String,
    /// The item's stored metadata record.
    pub value: Metadata,
    /// Cost at the time of the query.
    pub cost: f64,
    /// Availability at the time of the query.
    pub available: bool,
}

/// Per-query settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Fields to search, in iteration order. `None` selects the configured
    /// default field set.
    pub search_by: Option<Vec<String>>,
    /// Skip cache reads for this query. The cache is still refreshed with
    /// the freshly computed matches.
    pub force: bool,
}

impl SearchSettings {
    /// Settings that search only the given fields.
    pub fn by_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_by: Some(fields.into_iter().map(Into::into).collect()),
            force: false,
        }
    }

    /// Returns a copy of these settings with cache reads bypassed.
    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

/// How a field's candidate strings are projected from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Candidates are the item names.
    Name,
    /// Candidates are `metadata[field]`, keyed back to the owning item name.
    Metadata(String),
}

impl FieldKind {
    /// Classify a configured field identifier.
    pub fn for_field(field: &str) -> Self {
        if field == NAME_FIELD {
            Self::Name
        } else {
            Self::Metadata(field.to_owned())
        }
    }

    /// The field identifier this kind was built from.
    pub fn field(&self) -> &str {
        match self {
            Self::Name => NAME_FIELD,
            Self::Metadata(field) => field,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}
