//! Column rendering
//!
//! [`render`] dispatches on the closed [`ColumnKind`] set, one pure
//! function per variant. Rendering is total: a cell that cannot be filled
//! renders [`CellContent::Empty`] and records a
//! [`RenderFallback`](crate::error::DiagnosticKind::RenderFallback)
//! diagnostic instead of failing.

mod cell;
mod columns;

pub use cell::*;

use crate::catalog::CurrencyFormat;
use crate::error::Diagnostic;
use crate::model::CartSettings;
use crate::model::CatalogItem;
use crate::model::Column;
use crate::model::ColumnKind;

/// Immutable inputs shared by every cell of a render.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Currency display rules.
    pub currency: CurrencyFormat,
    /// Cart behaviour of the table.
    pub cart: CartSettings,
}

impl RenderContext {
    /// Creates a render context.
    pub fn new(currency: CurrencyFormat, cart: CartSettings) -> Self {
        Self { currency, cart }
    }
}

/// A rendered cell with the diagnostics raised while filling it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell {
    /// Cell content.
    pub content: CellContent,
    /// Fallback diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

/// Renders one column for one item.
///
/// # Example
///
/// ```
/// use prodtable_lib::model::{CatalogItem, Column, ColumnKind, ItemId};
/// use prodtable_lib::render::{render, CellContent, RenderContext};
///
/// let item = CatalogItem::new(ItemId(1), "Mug").with_sku("MUG-1");
/// let cell = render(&Column::new("sku", ColumnKind::Sku), &item, &RenderContext::default());
/// assert_eq!(cell.content, CellContent::text("MUG-1"));
/// assert!(cell.diagnostics.is_empty());
/// ```
pub fn render(column: &Column, item: &CatalogItem, context: &RenderContext) -> RenderedCell {
    let mut cell = Cell {
        column: &column.id,
        item,
        context,
        diagnostics: Vec::new(),
    };
    let content = cell.render_kind(&column.kind, false);
    RenderedCell {
        content,
        diagnostics: cell.diagnostics,
    }
}

/// Per-cell rendering state.
pub(crate) struct Cell<'a> {
    pub(crate) column: &'a str,
    pub(crate) item: &'a CatalogItem,
    pub(crate) context: &'a RenderContext,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Cell<'_> {
    pub(crate) fn render_kind(&mut self, kind: &ColumnKind, nested: bool) -> CellContent {
        match kind {
            ColumnKind::Image(settings) => self.image(settings),
            ColumnKind::Name(settings) => self.name(settings),
            ColumnKind::Price => self.price(),
            ColumnKind::Sku => self.sku(),
            ColumnKind::Stock => self.stock(),
            ColumnKind::AddToCart => self.add_to_cart(),
            ColumnKind::Date(settings) => self.date(settings),
            ColumnKind::Summary(settings) => self.summary(settings),
            ColumnKind::Taxonomy(settings) => self.taxonomy(settings),
            ColumnKind::CustomField(settings) => self.custom_field(settings),
            ColumnKind::Combined(_) if nested => {
                self.fallback("combined element nested inside a combined column");
                CellContent::Empty
            }
            ColumnKind::Combined(settings) => self.combined(settings),
            ColumnKind::Unsupported(name) => {
                self.fallback(format!("unsupported column type '{}'", name));
                CellContent::Empty
            }
        }
    }

    /// Records a fallback diagnostic for this cell.
    pub(crate) fn fallback(&mut self, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::render_fallback(self.column, self.item.id, message));
    }

    /// Renders a missing value as empty with a diagnostic.
    pub(crate) fn missing(&mut self, what: &str) -> CellContent {
        self.fallback(format!("item has no {}", what));
        CellContent::Empty
    }
}
