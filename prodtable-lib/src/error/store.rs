//! Definition store error types

use crate::model::DefinitionId;

use super::NormalizeError;

/// Errors reported by a [`DefinitionStore`](crate::store::DefinitionStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No definition exists for the identifier.
    #[error("Definition {0} not found")]
    NotFound(DefinitionId),

    /// The saved value was based on an outdated revision.
    #[error("Definition {id} was modified concurrently (saving revision {expected}, stored revision {actual})")]
    Conflict {
        /// The definition being saved.
        id: DefinitionId,
        /// The revision the caller based its edit on.
        expected: u64,
        /// The revision currently stored.
        actual: u64,
    },

    /// SQLite backend error.
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),

    /// A sub-block could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A definition (saved or stored) does not normalize.
    #[error("definition is invalid: {0}")]
    Invalid(#[from] NormalizeError),
}

impl StoreError {
    /// Returns `true` if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
