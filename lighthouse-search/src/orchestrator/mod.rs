//! Search aggregator: per-field fan-out, weighting, max-merge, ranking.
//!
//! This module fans a query out to the selected field indexes concurrently,
//! weights each field's scores, merges them into one entry per item name
//! (best field wins), drops blocked names, and returns a sorted, truncated,
//! enriched result set.

pub mod merge;
pub mod scoring;
pub mod search;
