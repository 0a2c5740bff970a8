//! Error types for the search engine

use thiserror::Error;

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors surfaced by the public search API.
///
/// Cache failures are deliberately absent: the cache layer is a soft
/// resilience layer and its errors never leave the cache bridge.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A single document could not be indexed. Other documents are unaffected.
    #[error("Document indexing failed: {0}")]
    Indexing(String),

    /// Query retrieval or scoring failed. No partial results are surfaced.
    #[error("Search execution failed: {0}")]
    Query(String),

    /// Invalid search options or filters, rejected at the API boundary.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Serialization(err.to_string())
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for SearchError {
    fn from(err: validator::ValidationErrors) -> Self {
        SearchError::Validation(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        SearchError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::Indexing("empty id".to_string());
        assert_eq!(err.to_string(), "Document indexing failed: empty id");

        let err = SearchError::Validation("page must be >= 1".to_string());
        assert!(err.to_string().contains("Validation error"));
    }
}
