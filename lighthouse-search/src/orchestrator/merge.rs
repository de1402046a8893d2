//! Merge per-field matches into one entry per item name.
//!
//! The same item can match through several fields. Field scores measure
//! independent evidence, so they are never summed: the item keeps the
//! single highest weighted score it reached in any field.

use std::collections::{BTreeSet, HashMap};

use crate::types::ScoredMatch;

/// Max-merge weighted field results by item name, dropping blocked names.
///
/// Field lists are consumed in the order given. A name enters the merge
/// order where it is first encountered; when a later match raises its
/// score, the name moves to the end of the merge order. A later stable
/// sort breaks score ties by that order.
pub fn merge_by_name<I>(field_results: I, blocked: &BTreeSet<String>) -> Vec<ScoredMatch>
where
    I: IntoIterator<Item = Vec<ScoredMatch>>,
{
    // Superseded entries leave a `None` behind so positions stay valid.
    let mut slots: Vec<Option<ScoredMatch>> = Vec::new();
    // Map from item name → live slot in `slots`.
    let mut positions: HashMap<String, usize> = HashMap::new();

    for candidate in field_results.into_iter().flatten() {
        if blocked.contains(&candidate.name) {
            continue;
        }
        if let Some(&pos) = positions.get(&candidate.name) {
            let raised = slots[pos]
                .as_ref()
                .is_some_and(|current| candidate.score > current.score);
            if !raised {
                continue;
            }
            slots[pos] = None;
        }
        positions.insert(candidate.name.clone(), slots.len());
        slots.push(Some(candidate));
    }

    slots.into_iter().flatten().collect()
}
