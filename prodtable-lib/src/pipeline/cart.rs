//! Cart action descriptors
//!
//! The pipeline only describes the action a row offers; performing the add
//! is the host's business.

use serde::Serialize;

use crate::model::CartMethod;
use crate::model::CartSettings;
use crate::model::CatalogItem;
use crate::model::ItemId;
use crate::model::StockStatus;

/// Whether a row's item can be added to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Eligibility {
    /// The item can be added.
    Eligible,
    /// The catalog marks the item as not purchasable.
    NotPurchasable,
    /// The item is out of stock.
    OutOfStock,
}

/// The cart action a row offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAction {
    /// Interaction method.
    pub method: CartMethod,
    /// Item the action adds.
    pub item_id: ItemId,
    /// Whether the host adds asynchronously.
    pub ajax: bool,
    /// Whether a quantity selector accompanies the action.
    pub quantity_selector: bool,
    /// Whether the action is available.
    pub eligibility: Eligibility,
}

impl CartAction {
    /// Describes the action for an item under the given cart settings.
    pub fn for_item(item: &CatalogItem, cart: &CartSettings) -> Self {
        let eligibility = if !item.purchasable {
            Eligibility::NotPurchasable
        } else if item.stock_status() == StockStatus::OutOfStock {
            Eligibility::OutOfStock
        } else {
            Eligibility::Eligible
        };

        Self {
            method: cart.method,
            item_id: item.id,
            ajax: cart.ajax_add,
            quantity_selector: cart.quantity_selector,
            eligibility,
        }
    }

    /// Returns `true` if the action is available.
    pub fn is_eligible(&self) -> bool {
        self.eligibility == Eligibility::Eligible
    }
}
