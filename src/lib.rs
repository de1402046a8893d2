//! Lighthouse: fuzzy search over a catalog of named items.
//!
//! This crate wires the [`lighthouse_search`] core to a concrete catalog,
//! similarity scorer and HTTP front end:
//!
//! - **Catalog**: in-memory item store serving metadata and cost/availability
//! - **Matcher**: ratio-based character similarity via `similar`
//! - **Server**: `axum` service exposing `POST /search` and `GET /health`
//! - **Config**: TOML configuration for all of the above

pub mod catalog;
pub mod config;
pub mod error;
pub mod matcher;
pub mod server;

use std::sync::Arc;

use lighthouse_search::Aggregator;

pub use catalog::{Catalog, CatalogItem};
pub use config::LighthouseConfig;
pub use error::{LighthouseError, Result};
pub use matcher::RatioMatcher;
pub use server::SearchServer;

/// Load the configured catalog, or an empty one when no path is set.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or parsed.
pub fn load_catalog(config: &LighthouseConfig) -> Result<Catalog> {
    match &config.catalog.path {
        Some(path) => Catalog::load_from_file(path),
        None => {
            tracing::warn!("no catalog path configured, starting with an empty catalog");
            Ok(Catalog::new())
        }
    }
}

/// Build an aggregator over `catalog` using the configured matcher and search settings.
///
/// # Errors
///
/// Returns [`LighthouseError::Search`] if the search configuration is invalid.
pub fn build_aggregator(config: &LighthouseConfig, catalog: Arc<Catalog>) -> Result<Aggregator> {
    let matcher = Arc::new(RatioMatcher::new(config.matcher.score_cutoff));
    let aggregator = Aggregator::new(config.search.clone(), matcher, catalog.clone(), catalog)?;
    Ok(aggregator)
}

/// Load the catalog, build the aggregator, and start the HTTP server.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the catalog cannot be
/// loaded, or the listener cannot bind.
pub async fn start(config: &LighthouseConfig) -> Result<SearchServer> {
    config.validate()?;
    let catalog = Arc::new(load_catalog(config)?);
    let aggregator = Arc::new(build_aggregator(config, Arc::clone(&catalog))?);
    SearchServer::start(aggregator, catalog, &config.server).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use lighthouse_search::SearchSettings;

    #[test]
    fn missing_catalog_path_gives_empty_catalog() {
        let catalog = load_catalog(&LighthouseConfig::default()).expect("load");
        assert!(catalog.is_empty());
    }

    #[test]
    fn invalid_search_config_is_rejected() {
        let mut config = LighthouseConfig::default();
        config.search.fields.clear();
        let err = build_aggregator(&config, Arc::new(Catalog::new())).err().expect("invalid config should be rejected");
        assert!(matches!(err, LighthouseError::Search(_)));
    }

    #[tokio::test]
    async fn aggregator_searches_catalog_with_ratio_matcher() {
        let catalog = Arc::new(Catalog::from_items([
            CatalogItem {
                name: "alice".into(),
                metadata: [("title".to_owned(), "Alice in Wonderland".to_owned())].into(),
                cost: 2.5,
                available: true,
            },
            CatalogItem {
                name: "bob".into(),
                metadata: [("title".to_owned(), "Bob the Builder".to_owned())].into(),
                cost: 1.0,
                available: false,
            },
        ]));
        let aggregator =
            build_aggregator(&LighthouseConfig::default(), catalog).expect("aggregator");

        let settings = SearchSettings::by_fields(["name", "title"]);
        let results = aggregator.search("alice", &settings).await.expect("search");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "alice");
        assert!((results[0].cost - 2.5).abs() < f64::EPSILON);
        assert!(results[0].available);
    }
}
