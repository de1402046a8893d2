//! # lighthouse-search
//!
//! Multi-index fuzzy search over a catalog of named items.
//!
//! Each searchable field (the item name, or a metadata field such as
//! `title`) gets its own [`FuzzyIndex`] with a bounded result cache. The
//! [`Aggregator`] fans a query out to the selected fields concurrently,
//! weights each field's scores, keeps the best score per item, drops
//! blocked names, and returns the top results enriched with metadata and
//! cost/availability.
//!
//! ## Design
//!
//! - String scoring is delegated to a [`SimilarityPrimitive`]; this crate
//!   only orchestrates, caches, weights, and ranks
//! - The catalog is read through [`MetadataStore`] and [`AvailabilityStore`]
//! - Scoring runs on the blocking worker pool; the coordinating task only
//!   waits at the fan-out barrier
//! - Any field failure fails the whole query; there are no partial results
//!
//! ## Logging
//!
//! Query text is logged only at trace level.

pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod orchestrator;
pub mod similarity;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cache::SearchCache;
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use index::FuzzyIndex;
pub use orchestrator::search::Aggregator;
pub use similarity::{Candidate, SimilarityPrimitive};
pub use store::{AvailabilityStore, MetadataStore};
pub use types::{
    CostAvailability, EnrichedResult, FieldKind, Metadata, ScoredMatch, SearchSettings, NAME_FIELD,
};
