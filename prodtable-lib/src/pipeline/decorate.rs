//! Row decoration step

use serde::Serialize;

use super::CartAction;
use crate::model::CatalogItem;
use crate::model::Settings;

/// Per-row affordances derived from the settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDecoration {
    /// Whether the row offers a bulk-selection checkbox.
    pub selectable: bool,
    /// The row's cart action, when the cart is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartAction>,
}

/// Decorates one row.
pub fn decorate(item: &CatalogItem, settings: &Settings) -> RowDecoration {
    let cart = settings
        .cart
        .enabled
        .then(|| CartAction::for_item(item, &settings.cart));
    RowDecoration {
        selectable: settings.features.bulk_select.enabled && cart.as_ref().is_some_and(CartAction::is_eligible),
        cart,
    }
}
