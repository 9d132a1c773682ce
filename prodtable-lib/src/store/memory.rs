//! In-memory definition store using DashMap

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use dashmap::DashMap;

use super::DefinitionStore;
use super::ListFilter;
use super::validate;
use crate::error::StoreError;
use crate::model::DefinitionId;
use crate::model::TableDefinition;
use crate::model::TableDefinitionSummary;

/// A definition store backed by a concurrent hash map.
///
/// Data is lost when the process exits.
///
/// # Example
///
/// ```
/// use prodtable_lib::store::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    definitions: DashMap<DefinitionId, TableDefinition>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[async_trait]
impl DefinitionStore for InMemoryStore {
    async fn get(&self, id: DefinitionId) -> Result<TableDefinition, StoreError> {
        self.definitions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<TableDefinitionSummary>, StoreError> {
        let mut summaries: Vec<TableDefinitionSummary> = self
            .definitions
            .iter()
            .filter(|entry| filter.matches(&entry.title, entry.status))
            .filter_map(|entry| entry.value().summary())
            .collect();
        summaries.sort_by_key(|s| s.id);
        Ok(summaries)
    }

    async fn save(&self, definition: TableDefinition) -> Result<TableDefinition, StoreError> {
        validate(&definition)?;

        let Some(id) = definition.id else {
            let id = DefinitionId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
            let stored = TableDefinition {
                id: Some(id),
                revision: 1,
                ..definition
            };
            self.definitions.insert(id, stored.clone());
            log::debug!("Created definition {}", id);
            return Ok(stored);
        };

        // The shard lock is held across the check and the replace.
        let mut entry = self.definitions.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if entry.revision != definition.revision {
            return Err(StoreError::Conflict {
                id,
                expected: definition.revision,
                actual: entry.revision,
            });
        }
        let stored = TableDefinition {
            revision: definition.revision + 1,
            ..definition
        };
        *entry = stored.clone();
        log::debug!("Saved definition {} at revision {}", id, stored.revision);
        Ok(stored)
    }

    async fn delete(&self, id: DefinitionId) -> Result<(), StoreError> {
        self.definitions
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;
    use crate::model::ColumnKind;
    use crate::model::Status;

    #[tokio::test]
    async fn test_save_assigns_id_and_revision() {
        let store = InMemoryStore::new();
        let first = store.save(TableDefinition::default()).await.unwrap();
        let second = store.save(TableDefinition::default()).await.unwrap();

        assert_eq!(first.id, Some(DefinitionId(1)));
        assert_eq!(second.id, Some(DefinitionId(2)));
        assert_eq!(first.revision, 1);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_definition() {
        let store = InMemoryStore::new();
        let saved = store
            .save(TableDefinition::default().with_columns(vec![Column::new("sku", ColumnKind::Sku)]))
            .await
            .unwrap();

        let edited = saved.clone().with_columns(Vec::new()).with_title("Empty");
        let stored = store.save(edited).await.unwrap();
        assert_eq!(stored.revision, 2);

        let loaded = store.get(saved.id.unwrap()).await.unwrap();
        assert!(loaded.columns.is_empty());
        assert_eq!(loaded.title, "Empty");
    }

    #[tokio::test]
    async fn test_stale_revision_conflicts() {
        let store = InMemoryStore::new();
        let saved = store.save(TableDefinition::default()).await.unwrap();
        store.save(saved.clone().with_title("First")).await.unwrap();

        let err = store.save(saved.with_title("Second")).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Conflict {
                expected: 1,
                actual: 2,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unknown_id_not_found() {
        let store = InMemoryStore::new();
        let orphan = TableDefinition::default().with_identity(DefinitionId(9), 1);
        assert!(store.save(orphan).await.unwrap_err().is_not_found());
        assert!(store.get(DefinitionId(9)).await.unwrap_err().is_not_found());
        assert!(store.delete(DefinitionId(9)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_rejects_definition_that_would_not_load() {
        let store = InMemoryStore::new();
        let duplicate = TableDefinition::default().with_columns(vec![
            Column::new("a", ColumnKind::Sku),
            Column::new("a", ColumnKind::Price),
        ]);
        let unknown = TableDefinition::default()
            .with_columns(vec![Column::new("r", ColumnKind::Unsupported("rating".to_string()))]);

        assert!(matches!(store.save(duplicate).await, Err(StoreError::Invalid(_))));
        assert!(matches!(store.save(unknown).await, Err(StoreError::Invalid(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_status_and_title() {
        let store = InMemoryStore::new();
        store.save(TableDefinition::default().with_title("Mugs")).await.unwrap();
        store
            .save(TableDefinition::default().with_title("Big Mugs").with_status(Status::Published))
            .await
            .unwrap();
        store.save(TableDefinition::default().with_title("Plates")).await.unwrap();

        let all = store.list(&ListFilter::new()).await.unwrap();
        assert_eq!(all.len(), 3);

        let mugs = store.list(&ListFilter::new().with_search("mug")).await.unwrap();
        assert_eq!(mugs.iter().map(|s| s.id.0).collect::<Vec<_>>(), vec![1, 2]);

        let published = store.list(&ListFilter::new().with_status(Status::Published)).await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].title, "Big Mugs");
    }
}
