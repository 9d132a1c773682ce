//! Table definition root entity

use serde::Serialize;

use super::Column;
use super::Settings;
use super::Source;
use super::Style;

/// Identifier of a persisted table definition, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DefinitionId(pub u64);

impl std::fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Being edited, not shown publicly.
    #[default]
    Draft,
    /// Live.
    Published,
}

impl Status {
    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "published" | "publish" => Some(Self::Published),
            _ => None,
        }
    }

    /// Returns the persisted string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

/// Default title of a new definition.
pub const DEFAULT_TITLE: &str = "Product table";

/// A declarative product table definition.
///
/// Definitions are values: every edit produces a new definition through the
/// `with_*` builders, and a save always writes the whole value.
///
/// # Example
///
/// ```
/// use prodtable_lib::model::{Column, ColumnKind, NameSettings, Source, TableDefinition};
///
/// let definition = TableDefinition::default()
///     .with_title("Mugs")
///     .with_source(Source::by_category([12]))
///     .with_columns(vec![
///         Column::new("name", ColumnKind::Name(NameSettings::default())),
///         Column::new("price", ColumnKind::Price),
///     ]);
/// assert!(definition.id.is_none());
/// assert_eq!(definition.columns.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDefinition {
    /// Identifier, absent until first saved.
    pub id: Option<DefinitionId>,
    /// Title.
    pub title: String,
    /// Lifecycle status.
    pub status: Status,
    /// Store-managed revision, bumped on every save.
    pub revision: u64,
    /// Which items to include.
    pub source: Source,
    /// Columns; list order is significant.
    pub columns: Vec<Column>,
    /// Feature toggles and behaviour.
    pub settings: Settings,
    /// Style tokens.
    pub style: Style,
}

impl Default for TableDefinition {
    fn default() -> Self {
        Self {
            id: None,
            title: DEFAULT_TITLE.to_string(),
            status: Status::default(),
            revision: 0,
            source: Source::default(),
            columns: Vec::new(),
            settings: Settings::default(),
            style: Style::default(),
        }
    }
}

impl TableDefinition {
    /// Returns a copy with the given title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Returns a copy with the given status.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Returns a copy with the given source.
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    /// Returns a copy with the given columns.
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Returns a copy with the given settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns a copy with the given style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Returns a copy carrying store-assigned identity.
    pub fn with_identity(mut self, id: DefinitionId, revision: u64) -> Self {
        self.id = Some(id);
        self.revision = revision;
        self
    }

    /// Looks up a column by identifier.
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Returns the listing summary of this definition.
    pub fn summary(&self) -> Option<TableDefinitionSummary> {
        Some(TableDefinitionSummary {
            id: self.id?,
            title: self.title.clone(),
            status: self.status,
            revision: self.revision,
            column_count: self.columns.len(),
        })
    }
}

/// A listing entry for a persisted definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinitionSummary {
    /// Identifier.
    pub id: DefinitionId,
    /// Title.
    pub title: String,
    /// Lifecycle status.
    pub status: Status,
    /// Current revision.
    pub revision: u64,
    /// Number of columns.
    pub column_count: usize,
}
