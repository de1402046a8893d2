//! Configuration types for the search service.

use std::path::PathBuf;

use lighthouse_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{LighthouseError, Result};

/// Top-level configuration for the search service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LighthouseConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Where the item catalog is loaded from.
    pub catalog: CatalogConfig,
    /// Similarity scoring settings.
    pub matcher: MatcherConfig,
    /// Field layout, weights, caching and ranking for the search core.
    pub search: SearchConfig,
}

/// HTTP query service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port (0 = auto-assign).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 50005,
        }
    }
}

/// Catalog source configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON catalog file. `None` starts with an empty catalog.
    pub path: Option<PathBuf>,
}

/// Similarity scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Candidates scoring below this (on the 0–100 scale) are not matches.
    pub score_cutoff: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self { score_cutoff: 50.0 }
    }
}

impl LighthouseConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| LighthouseError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| LighthouseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/lighthouse/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| std::env::temp_dir().join("lighthouse-config"))
            .join("lighthouse")
            .join("config.toml")
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns [`LighthouseError::Config`] for an out-of-range cutoff, or the
    /// search core's own validation error.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.matcher.score_cutoff) {
            return Err(LighthouseError::Config(
                "matcher.score_cutoff must be between 0 and 100".into(),
            ));
        }
        self.search.validate()?;
        Ok(())
    }
}
