//! In-memory item catalog.
//!
//! Holds each item's metadata record together with its current cost and
//! availability, and serves both to the search core through the
//! [`MetadataStore`] and [`AvailabilityStore`] contracts. Updates take a
//! write lock; any number of in-flight queries may read concurrently.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lighthouse_search::{
    AvailabilityStore, CostAvailability, Metadata, MetadataStore, SearchError,
};
use serde::{Deserialize, Serialize};

use crate::error::{LighthouseError, Result};

/// One catalog entry as stored on disk and in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique item name.
    pub name: String,
    /// Searchable metadata fields.
    #[serde(default)]
    pub metadata: Metadata,
    /// Cost to obtain the item.
    #[serde(default)]
    pub cost: f64,
    /// Whether the item can currently be obtained.
    #[serde(default)]
    pub available: bool,
}

#[derive(Debug, Clone)]
struct Entry {
    metadata: Metadata,
    availability: CostAvailability,
}

/// Thread-safe item catalog, ordered by name.
#[derive(Debug, Default)]
pub struct Catalog {
    items: RwLock<BTreeMap<String, Entry>>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding `items`. Later duplicates replace earlier ones.
    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let catalog = Self::new();
        {
            let mut map = catalog.write();
            for item in items {
                let (name, entry) = split(item);
                map.insert(name, entry);
            }
        }
        catalog
    }

    /// Load a catalog from a JSON array of [`CatalogItem`].
    ///
    /// # Errors
    ///
    /// Returns [`LighthouseError::Io`] if the file cannot be read, or
    /// [`LighthouseError::Catalog`] if it is not a valid item array.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let items: Vec<CatalogItem> = serde_json::from_str(&content).map_err(|e| {
            LighthouseError::Catalog(format!("invalid catalog {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), items = items.len(), "loaded catalog");
        Ok(Self::from_items(items))
    }

    /// Insert a new item or replace an existing one.
    pub fn upsert(&self, item: CatalogItem) {
        let (name, entry) = split(item);
        self.write().insert(name, entry);
    }

    /// Remove an item. Returns it if it existed.
    pub fn remove(&self, name: &str) -> Option<CatalogItem> {
        self.write().remove(name).map(|entry| CatalogItem {
            name: name.to_owned(),
            metadata: entry.metadata,
            cost: entry.availability.cost,
            available: entry.availability.available,
        })
    }

    /// Update an item's cost and availability.
    ///
    /// Returns `false` if no item is named `name`.
    pub fn set_availability(&self, name: &str, cost: f64, available: bool) -> bool {
        match self.write().get_mut(name) {
            Some(entry) => {
                entry.availability = CostAvailability { cost, available };
                true
            }
            None => false,
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if the catalog holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Entry>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Entry>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn split(item: CatalogItem) -> (String, Entry) {
    (
        item.name,
        Entry {
            metadata: item.metadata,
            availability: CostAvailability {
                cost: item.cost,
                available: item.available,
            },
        },
    )
}

impl MetadataStore for Catalog {
    fn all_names(&self) -> std::result::Result<Vec<String>, SearchError> {
        Ok(self.read().keys().cloned().collect())
    }

    fn get(&self, name: &str) -> std::result::Result<Option<Metadata>, SearchError> {
        Ok(self.read().get(name).map(|entry| entry.metadata.clone()))
    }

    fn field_value(
        &self,
        name: &str,
        field: &str,
    ) -> std::result::Result<Option<String>, SearchError> {
        Ok(self
            .read()
            .get(name)
            .and_then(|entry| entry.metadata.get(field).cloned()))
    }
}

impl AvailabilityStore for Catalog {
    fn get(&self, name: &str) -> std::result::Result<Option<CostAvailability>, SearchError> {
        Ok(self.read().get(name).map(|entry| entry.availability))
    }
}
