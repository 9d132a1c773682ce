//! Catalog error types

use std::time::Duration;

/// Errors reported by a [`Catalog`](crate::catalog::Catalog) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The catalog backend could not serve the request.
    #[error("{0}")]
    Unavailable(String),

    /// The catalog did not answer in time.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// The catalog rejected the query itself.
    #[error("query rejected: {0}")]
    Rejected(String),
}

impl CatalogError {
    /// Creates a new unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Returns `true` if the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}
