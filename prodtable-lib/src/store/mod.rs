//! Definition persistence
//!
//! A [`DefinitionStore`] keeps table definitions as four typed sub-blocks
//! (`source`, `columns`, `settings`, `style`). Saves always replace the whole
//! definition; concurrent edits are detected through the revision counter.

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::DefinitionId;
use crate::model::Status;
use crate::model::TableDefinition;
use crate::model::TableDefinitionSummary;
use crate::normalize::normalize;

/// Trait for definition stores.
///
/// Implementations are responsible for:
/// - Assigning an id and revision 1 to definitions saved without an id
/// - Rejecting saves whose revision differs from the stored one
/// - Returning definitions exactly as they were saved
#[async_trait]
pub trait DefinitionStore: Send + Sync {
    /// Loads a definition.
    async fn get(&self, id: DefinitionId) -> Result<TableDefinition, StoreError>;

    /// Lists definitions matching a filter, ordered by id.
    async fn list(&self, filter: &ListFilter) -> Result<Vec<TableDefinitionSummary>, StoreError>;

    /// Saves a definition and returns the stored value.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the definition has an id that is not stored
    /// - [`StoreError::Conflict`] if its revision is not the stored revision
    /// - [`StoreError::Invalid`] if the definition would not load back
    async fn save(&self, definition: TableDefinition) -> Result<TableDefinition, StoreError>;

    /// Deletes a definition.
    async fn delete(&self, id: DefinitionId) -> Result<(), StoreError>;
}

/// Checks that a definition survives its own serialized form.
///
/// Stores call this before writing anything, so every saved record loads.
pub(crate) fn validate(definition: &TableDefinition) -> Result<(), StoreError> {
    normalize(&serde_json::to_value(definition)?)?;
    Ok(())
}

/// Criteria for [`DefinitionStore::list`].
///
/// # Example
///
/// ```
/// use prodtable_lib::model::Status;
/// use prodtable_lib::store::ListFilter;
///
/// let filter = ListFilter::new().with_status(Status::Published).with_search("mug");
/// assert!(filter.matches("Coffee Mugs", Status::Published));
/// assert!(!filter.matches("Coffee Mugs", Status::Draft));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Only definitions with this status.
    pub status: Option<Status>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
}

impl ListFilter {
    /// Creates a filter matching every definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a status.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to titles containing a term. Blank terms are ignored.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let search = search.trim();
        self.search = (!search.is_empty()).then(|| search.to_string());
        self
    }

    /// Returns `true` if a definition with this title and status matches.
    pub fn matches(&self, title: &str, status: Status) -> bool {
        if self.status.is_some_and(|s| s != status) {
            return false;
        }
        match &self.search {
            Some(term) => title.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }
}
