//! SQLite-backed definition store.

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_sqlite::JournalMode;
use async_sqlite::rusqlite;
use async_sqlite::rusqlite::OptionalExtension;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Map;
use serde_json::Value as Json;

use super::DefinitionStore;
use super::ListFilter;
use super::validate;
use crate::error::StoreError;
use crate::model::DefinitionId;
use crate::model::Status;
use crate::model::TableDefinition;
use crate::model::TableDefinitionSummary;
use crate::normalize::normalize;

/// A persistent definition store backed by SQLite.
///
/// Each sub-block is stored as JSON text in its own column and read back
/// through normalization. Rows written by older hosts may carry only an
/// opaque `config` blob; those load with default sub-blocks.
///
/// # Example
///
/// ```ignore
/// use prodtable_lib::store::SqliteStore;
///
/// let store = SqliteStore::open("definitions.db").await?;
/// ```
pub struct SqliteStore {
    client: Client,
}

/// A raw row of the `definitions` table.
struct StoredRow {
    id: i64,
    title: String,
    status: String,
    revision: i64,
    source: Option<String>,
    columns: Option<String>,
    settings: Option<String>,
    style: Option<String>,
    config: Option<String>,
}

/// Encoded sub-blocks of a definition.
struct Encoded {
    title: String,
    status: &'static str,
    source: String,
    columns: String,
    settings: String,
    style: String,
}

enum SaveOutcome {
    Saved(i64),
    Missing,
    Stale(i64),
}

const SELECT_ROW: &str = "SELECT id, title, status, revision, source, columns, settings, style, config
     FROM definitions WHERE id = ?";

impl SqliteStore {
    /// Opens a store at the specified path.
    ///
    /// Creates the database file and table if they don't exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let client = ClientBuilder::new()
            .path(path)
            .journal_mode(JournalMode::Wal)
            .open()
            .await?;

        Self::init_schema(&client).await?;

        Ok(Self { client })
    }

    /// Opens an in-memory store.
    ///
    /// Useful for testing. Data is lost when the store is dropped.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let client = ClientBuilder::new().path(":memory:").open().await?;

        Self::init_schema(&client).await?;

        Ok(Self { client })
    }

    async fn init_schema(client: &Client) -> Result<(), async_sqlite::Error> {
        client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS definitions (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        title TEXT NOT NULL,
                        status TEXT NOT NULL,
                        revision INTEGER NOT NULL,
                        source TEXT,
                        columns TEXT,
                        settings TEXT,
                        style TEXT,
                        config TEXT,
                        updated_at INTEGER NOT NULL
                    )",
                    [],
                )?;
                conn.execute(
                    "CREATE INDEX IF NOT EXISTS idx_definitions_status ON definitions(status)",
                    [],
                )?;
                Ok(())
            })
            .await
    }

    /// Returns the number of stored definitions.
    pub async fn len(&self) -> Result<usize, StoreError> {
        let count = self
            .client
            .conn(|conn| conn.query_row("SELECT COUNT(*) FROM definitions", [], |row| row.get::<_, i64>(0)))
            .await?;
        Ok(count as usize)
    }

    /// Returns `true` if the store is empty.
    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().await.map(|len| len == 0)
    }

    fn encode(definition: &TableDefinition) -> Result<Encoded, StoreError> {
        Ok(Encoded {
            title: definition.title.clone(),
            status: definition.status.as_str(),
            source: serde_json::to_string(&definition.source)?,
            columns: serde_json::to_string(&definition.columns)?,
            settings: serde_json::to_string(&definition.settings)?,
            style: serde_json::to_string(&definition.style)?,
        })
    }

    fn decode(row: StoredRow) -> Result<TableDefinition, StoreError> {
        let mut raw = Map::new();
        raw.insert("id".to_string(), Json::from(row.id));
        raw.insert("title".to_string(), Json::from(row.title));
        raw.insert("status".to_string(), Json::from(row.status));
        raw.insert("revision".to_string(), Json::from(row.revision));

        let blocks = [
            ("source", row.source),
            ("columns", row.columns),
            ("settings", row.settings),
            ("style", row.style),
        ];
        if row.config.is_some() && blocks.iter().all(|(_, block)| block.is_none()) {
            log::warn!(
                "Definition {} only has a legacy config blob, loading default settings",
                row.id
            );
        }
        for (key, block) in blocks {
            if let Some(text) = block {
                raw.insert(key.to_string(), serde_json::from_str(&text)?);
            }
        }

        Ok(normalize(&Json::Object(raw))?)
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        id: row.get(0)?,
        title: row.get(1)?,
        status: row.get(2)?,
        revision: row.get(3)?,
        source: row.get(4)?,
        columns: row.get(5)?,
        settings: row.get(6)?,
        style: row.get(7)?,
        config: row.get(8)?,
    })
}

fn to_id(id: DefinitionId) -> i64 {
    id.0 as i64
}

#[async_trait]
impl DefinitionStore for SqliteStore {
    async fn get(&self, id: DefinitionId) -> Result<TableDefinition, StoreError> {
        let key = to_id(id);
        let row = self
            .client
            .conn(move |conn| conn.query_row(SELECT_ROW, [key], read_row).optional())
            .await?;

        match row {
            Some(row) => Self::decode(row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<TableDefinitionSummary>, StoreError> {
        let status = filter.status.map(|s| s.as_str());
        let search = filter.search.clone();

        let rows = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, title, status, revision, columns FROM definitions
                     WHERE (?1 IS NULL OR status = ?1)
                       AND (?2 IS NULL OR instr(lower(title), lower(?2)) > 0)
                     ORDER BY id",
                )?;
                let rows = stmt
                    .query_map(rusqlite::params![status, search], |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, i64>(3)?,
                            row.get::<_, Option<String>>(4)?,
                        ))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter()
            .map(|(id, title, status, revision, columns)| {
                let column_count = match columns {
                    Some(text) => serde_json::from_str::<Vec<Json>>(&text)?.len(),
                    None => 0,
                };
                Ok(TableDefinitionSummary {
                    id: DefinitionId(id as u64),
                    title,
                    status: Status::parse(&status).unwrap_or_default(),
                    revision: revision as u64,
                    column_count,
                })
            })
            .collect()
    }

    async fn save(&self, definition: TableDefinition) -> Result<TableDefinition, StoreError> {
        validate(&definition)?;
        let encoded = Self::encode(&definition)?;
        let now = Utc::now().timestamp();

        let Some(id) = definition.id else {
            let row_id = self
                .client
                .conn(move |conn| {
                    conn.execute(
                        "INSERT INTO definitions (title, status, revision, source, columns, settings, style, updated_at)
                         VALUES (?, ?, 1, ?, ?, ?, ?, ?)",
                        rusqlite::params![
                            encoded.title,
                            encoded.status,
                            encoded.source,
                            encoded.columns,
                            encoded.settings,
                            encoded.style,
                            now
                        ],
                    )?;
                    Ok(conn.last_insert_rowid())
                })
                .await?;

            let id = DefinitionId(row_id as u64);
            log::debug!("Created definition {}", id);
            return Ok(definition.with_identity(id, 1));
        };

        let key = to_id(id);
        let expected = definition.revision as i64;
        let outcome = self
            .client
            .conn(move |conn| {
                let changed = conn.execute(
                    "UPDATE definitions
                     SET title = ?, status = ?, revision = revision + 1,
                         source = ?, columns = ?, settings = ?, style = ?, config = NULL, updated_at = ?
                     WHERE id = ? AND revision = ?",
                    rusqlite::params![
                        encoded.title,
                        encoded.status,
                        encoded.source,
                        encoded.columns,
                        encoded.settings,
                        encoded.style,
                        now,
                        key,
                        expected
                    ],
                )?;
                if changed == 1 {
                    return Ok(SaveOutcome::Saved(expected + 1));
                }
                let actual = conn
                    .query_row("SELECT revision FROM definitions WHERE id = ?", [key], |row| {
                        row.get::<_, i64>(0)
                    })
                    .optional()?;
                Ok(match actual {
                    Some(actual) => SaveOutcome::Stale(actual),
                    None => SaveOutcome::Missing,
                })
            })
            .await?;

        match outcome {
            SaveOutcome::Saved(revision) => {
                log::debug!("Saved definition {} at revision {}", id, revision);
                Ok(definition.with_identity(id, revision as u64))
            }
            SaveOutcome::Missing => Err(StoreError::NotFound(id)),
            SaveOutcome::Stale(actual) => Err(StoreError::Conflict {
                id,
                expected: definition.revision,
                actual: actual as u64,
            }),
        }
    }

    async fn delete(&self, id: DefinitionId) -> Result<(), StoreError> {
        let key = to_id(id);
        let removed = self
            .client
            .conn(move |conn| conn.execute("DELETE FROM definitions WHERE id = ?", [key]))
            .await?;

        if removed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::model::Column;
    use crate::model::ColumnKind;
    use crate::model::NameSettings;
    use crate::model::PriceRange;
    use crate::model::Source;

    fn sample() -> TableDefinition {
        TableDefinition::default()
            .with_title("Mugs")
            .with_source(
                Source::by_category([12, 14]).with_price_range(PriceRange::new(Some(Decimal::from(5)), None)),
            )
            .with_columns(vec![
                Column::new("name", ColumnKind::Name(NameSettings::default())),
                Column::new("price", ColumnKind::Price).with_order(-1),
            ])
    }

    #[tokio::test]
    async fn test_round_trips_definition() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let saved = store.save(sample()).await.unwrap();
        let loaded = store.get(saved.id.unwrap()).await.unwrap();
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("definitions.db");

        let id = {
            let store = SqliteStore::open(&path).await.unwrap();
            store.save(sample()).await.unwrap().id.unwrap()
        };

        let store = SqliteStore::open(&path).await.unwrap();
        let loaded = store.get(id).await.unwrap();
        assert_eq!(loaded.title, "Mugs");
        assert_eq!(loaded.columns.len(), 2);
    }

    #[tokio::test]
    async fn test_stale_revision_conflicts() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let saved = store.save(sample()).await.unwrap();
        let second = store.save(saved.clone().with_title("Renamed")).await.unwrap();
        assert_eq!(second.revision, 2);

        let err = store.save(saved).await.unwrap_err();
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
    async fn test_missing_definition() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        assert!(store.get(DefinitionId(4)).await.unwrap_err().is_not_found());
        assert!(store.delete(DefinitionId(4)).await.unwrap_err().is_not_found());
        let orphan = sample().with_identity(DefinitionId(4), 1);
        assert!(store.save(orphan).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store.save(sample()).await.unwrap();
        let plates = store
            .save(TableDefinition::default().with_title("Plates").with_status(Status::Published))
            .await
            .unwrap();

        let mugs = store.list(&ListFilter::new().with_search("MUG")).await.unwrap();
        assert_eq!(mugs.len(), 1);
        assert_eq!(mugs[0].column_count, 2);

        let published = store.list(&ListFilter::new().with_status(Status::Published)).await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].title, "Plates");

        store.delete(plates.id.unwrap()).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_rejects_definition_that_would_not_load() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let duplicate = sample().with_columns(vec![
            Column::new("a", ColumnKind::Sku),
            Column::new("a", ColumnKind::Price),
        ]);
        let unknown = sample().with_columns(vec![Column::new("r", ColumnKind::Unsupported("rating".to_string()))]);

        assert!(matches!(store.save(duplicate).await, Err(StoreError::Invalid(_))));
        assert!(matches!(store.save(unknown).await, Err(StoreError::Invalid(_))));
        assert!(store.is_empty().await.unwrap());
        assert!(store.list(&ListFilter::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_legacy_config_blob_loads_defaults() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store
            .client
            .conn(|conn| {
                conn.execute(
                    "INSERT INTO definitions (id, title, status, revision, config, updated_at)
                     VALUES (7, 'Legacy', 'publish', 3, 'a:2:{s:4:\"cols\";}', 0)",
                    [],
                )
            })
            .await
            .unwrap();

        let loaded = store.get(DefinitionId(7)).await.unwrap();
        assert_eq!(loaded.title, "Legacy");
        assert_eq!(loaded.status, Status::Published);
        assert_eq!(loaded.revision, 3);
        assert!(loaded.columns.is_empty());
        assert_eq!(loaded.settings, TableDefinition::default().settings);
    }
}
