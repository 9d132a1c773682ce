//! Rendered output types

use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;
use crate::error::Diagnostic;
use crate::model::BulkSelectPosition;
use crate::model::DefinitionId;
use crate::model::ItemId;
use crate::pipeline::Facet;
use crate::pipeline::PaginationMeta;
use crate::pipeline::RowDecoration;
use crate::render::CellContent;
use crate::style::PresentationDescriptor;

/// What a render is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Full output for embedding in a page.
    #[default]
    Embed,
    /// Rows and pagination only, for asynchronous page/sort/search changes.
    Refresh,
    /// Full output of a transient, possibly unsaved definition.
    Preview,
}

impl Mode {
    /// Returns `true` if headers, presentation and facets are included.
    pub fn is_full(&self) -> bool {
        !matches!(self, Mode::Refresh)
    }

    /// Returns the string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Embed => "embed",
            Mode::Refresh => "refresh",
            Mode::Preview => "preview",
        }
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "embed" => Ok(Mode::Embed),
            "refresh" => Ok(Mode::Refresh),
            "preview" => Ok(Mode::Preview),
            other => Err(ConfigError::new("mode", format!("unknown mode '{}'", other))),
        }
    }
}

/// A column heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    /// Column identifier.
    pub column: String,
    /// Heading text; empty when the heading is hidden.
    pub text: String,
    /// Column type name.
    pub column_type: String,
    /// CSS width, if fixed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Whether a sort override may target this column.
    pub sortable: bool,
    /// Layout classes.
    pub classes: Vec<String>,
}

/// One rendered cell of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Column identifier.
    pub column: String,
    /// Content.
    pub content: CellContent,
    /// Layout classes.
    pub classes: Vec<String>,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Item the row shows.
    pub item: ItemId,
    /// Cells in render order.
    pub cells: Vec<Cell>,
    /// Row affordances.
    pub decoration: RowDecoration,
}

/// The output of a resolve/render cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedOutput {
    /// Render mode.
    pub mode: Mode,
    /// Definition identifier, absent for unsaved definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<DefinitionId>,
    /// Table title.
    pub title: String,
    /// Column headings in render order; empty in refresh mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<HeaderCell>,
    /// Rows of the current page.
    pub rows: Vec<Row>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
    /// Compiled presentation; absent in refresh mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation: Option<PresentationDescriptor>,
    /// Position of the bulk-selection column, when bulk select is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<BulkSelectPosition>,
    /// Taxonomy facets; empty in refresh mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
    /// Non-fatal diagnostics of the cycle.
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderedOutput {
    /// Returns the row of an item.
    pub fn row(&self, item: ItemId) -> Option<&Row> {
        self.rows.iter().find(|r| r.item == item)
    }

    /// Returns the item ids of the rows, in order.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.rows.iter().map(|r| r.item).collect()
    }
}
