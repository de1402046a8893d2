//! Error types for the lighthouse service.

use lighthouse_search::SearchError;

/// Top-level error type for the search service.
#[derive(Debug, thiserror::Error)]
pub enum LighthouseError {
    /// Configuration file or value error.
    #[error("config error: {0}")]
    Config(String),

    /// Catalog file or catalog update error.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// HTTP service error.
    #[error("server error: {0}")]
    Server(String),

    /// Query error from the search core.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, LighthouseError>;
