//! Rendered cell content

use serde::Serialize;

use crate::model::CombinedLayout;
use crate::pipeline::CartAction;

/// The structured content of one table cell.
///
/// Content is markup-free; writers such as [`html`](crate::html) or
/// [`export`](crate::export) decide how to present it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CellContent {
    /// Nothing to show.
    Empty,
    /// Plain text.
    Text {
        /// Text.
        text: String,
    },
    /// Text linking somewhere.
    Link {
        /// Link text.
        text: String,
        /// Target URL.
        href: String,
    },
    /// An image, optionally linked.
    Image {
        /// Image URL.
        src: String,
        /// Alternative text.
        alt: String,
        /// Link target, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        href: Option<String>,
    },
    /// A formatted price pair; `sale` is the active price when present.
    Price {
        /// Regular price.
        regular: String,
        /// Sale price.
        #[serde(skip_serializing_if = "Option::is_none")]
        sale: Option<String>,
    },
    /// Several values joined by a separator.
    List {
        /// Values.
        items: Vec<CellContent>,
        /// Separator between values.
        separator: String,
    },
    /// Sub-elements of a combined column.
    Composite {
        /// Layout.
        layout: CombinedLayout,
        /// Rendered sub-elements.
        parts: Vec<CellContent>,
    },
    /// A cart action.
    Action(CartAction),
}

impl CellContent {
    /// Creates a text cell.
    pub fn text(text: impl Into<String>) -> Self {
        CellContent::Text { text: text.into() }
    }

    /// Creates a link cell.
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        CellContent::Link {
            text: text.into(),
            href: href.into(),
        }
    }

    /// Returns `true` for [`CellContent::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    /// Flattens the content to plain text.
    ///
    /// Prices flatten to the active price, images to their alternative
    /// text, and actions to nothing.
    pub fn to_plain_text(&self) -> String {
        match self {
            CellContent::Empty | CellContent::Action(_) => String::new(),
            CellContent::Text { text } | CellContent::Link { text, .. } => text.clone(),
            CellContent::Image { alt, .. } => alt.clone(),
            CellContent::Price { regular, sale } => sale.clone().unwrap_or_else(|| regular.clone()),
            CellContent::List { items, separator } => items
                .iter()
                .map(CellContent::to_plain_text)
                .collect::<Vec<_>>()
                .join(separator),
            CellContent::Composite { layout, parts } => {
                let separator = match layout {
                    CombinedLayout::Inline => " ",
                    CombinedLayout::Stacked => "; ",
                };
                parts
                    .iter()
                    .map(CellContent::to_plain_text)
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(separator)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let cell = CellContent::Composite {
            layout: CombinedLayout::Stacked,
            parts: vec![
                CellContent::text("SKU-1"),
                CellContent::Empty,
                CellContent::Price {
                    regular: "$25.00".to_string(),
                    sale: Some("$18.00".to_string()),
                },
            ],
        };
        assert_eq!(cell.to_plain_text(), "SKU-1; $18.00");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(CellContent::link("Mug", "/mug")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "link", "text": "Mug", "href": "/mug"}));
        let json = serde_json::to_value(CellContent::Empty).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "empty"}));
    }
}
