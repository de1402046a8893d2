//! Error types for the lighthouse-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Query text never appears in error messages.

/// Errors that can occur while answering a search query.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid search configuration, or a query selecting a field that has
    /// no index. Caller mistake; never retried.
    #[error("config error: {0}")]
    Config(String),

    /// The similarity primitive, a catalog store, or a worker task failed
    /// while one field was being searched.
    #[error("backend error: {0}")]
    Backend(String),

    /// The per-field fan-out did not complete within the configured bound.
    #[error("search timed out: {0}")]
    Timeout(String),
}

/// Convenience type alias for lighthouse-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
