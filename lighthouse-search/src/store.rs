//! Read-only contracts for the catalog the aggregator searches.
//!
//! The catalog is owned elsewhere and updated on its own schedule. The
//! core only reads a current snapshot at query time, and may do so from
//! several in-flight queries at once.

use crate::error::SearchError;
use crate::types::{CostAvailability, Metadata};

/// Item metadata, keyed by item name.
pub trait MetadataStore: Send + Sync {
    /// Every item name currently in the catalog.
    ///
    /// The order is used as candidate order, so stores should return a
    /// stable order for identical contents.
    fn all_names(&self) -> Result<Vec<String>, SearchError>;

    /// The full metadata record for `name`, or `None` if it is unknown.
    fn get(&self, name: &str) -> Result<Option<Metadata>, SearchError>;

    /// A single metadata field for `name`. `None` if the item is unknown
    /// or has no such field.
    fn field_value(&self, name: &str, field: &str) -> Result<Option<String>, SearchError> {
        Ok(self.get(name)?.and_then(|mut record| record.remove(field)))
    }
}

/// Cost and availability, keyed by item name.
pub trait AvailabilityStore: Send + Sync {
    /// The current snapshot for `name`, or `None` if it is unknown.
    fn get(&self, name: &str) -> Result<Option<CostAvailability>, SearchError>;
}
