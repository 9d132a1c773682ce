//! Catalog item projections

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::Money;
use super::Value;

/// Identifier of a catalog item (product).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a taxonomy term (category, tag, attribute value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(pub u64);

impl std::fmt::Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Taxonomy key of product categories.
pub const CATEGORY_TAXONOMY: &str = "product_cat";
/// Taxonomy key of product tags.
pub const TAG_TAXONOMY: &str = "product_tag";

/// Stock status of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    /// Available.
    #[serde(rename = "instock")]
    InStock,
    /// Not available.
    #[serde(rename = "outofstock")]
    OutOfStock,
    /// Orderable, shipped later.
    #[serde(rename = "onbackorder")]
    OnBackorder,
}

impl StockStatus {
    /// Accepted string values.
    pub const VALUES: &'static [&'static str] = &["instock", "outofstock", "onbackorder"];

    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "instock" => Some(Self::InStock),
            "outofstock" => Some(Self::OutOfStock),
            "onbackorder" => Some(Self::OnBackorder),
            _ => None,
        }
    }

    /// Returns the persisted string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "instock",
            Self::OutOfStock => "outofstock",
            Self::OnBackorder => "onbackorder",
        }
    }
}

/// Stock information of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Stock status.
    pub status: StockStatus,
    /// Managed stock quantity, if the catalog tracks one.
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl Stock {
    /// Creates stock information without a tracked quantity.
    pub fn new(status: StockStatus) -> Self {
        Self { status, quantity: None }
    }

    /// Creates in-stock information with a tracked quantity.
    pub fn with_quantity(quantity: i64) -> Self {
        Self {
            status: StockStatus::InStock,
            quantity: Some(quantity),
        }
    }
}

/// An item image with its resized variants.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageRef {
    /// URL of the full-size image.
    pub url: String,
    /// Alternative text.
    #[serde(default)]
    pub alt: String,
    /// URLs per named size (`thumbnail`, `medium`, ...).
    #[serde(default)]
    pub sizes: BTreeMap<String, String>,
}

impl ImageRef {
    /// Creates an image reference with only the full-size URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: String::new(),
            sizes: BTreeMap::new(),
        }
    }

    /// Adds a resized variant (builder pattern).
    pub fn with_size(mut self, size: impl Into<String>, url: impl Into<String>) -> Self {
        self.sizes.insert(size.into(), url.into());
        self
    }

    /// Returns the URL for the given size, falling back to the full image.
    pub fn url_for(&self, size: &str) -> &str {
        self.sizes.get(size).map(String::as_str).unwrap_or(&self.url)
    }
}

/// A taxonomy term attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Term identifier.
    pub id: TermId,
    /// Display name.
    pub name: String,
    /// URL of the term archive, if any.
    #[serde(default)]
    pub url: Option<String>,
}

impl Term {
    /// Creates a term without an archive URL.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: TermId(id),
            name: name.into(),
            url: None,
        }
    }
}

/// The projection of a catalog item used by column rendering.
///
/// # Example
///
/// ```
/// use prodtable_lib::model::{CatalogItem, ItemId, Money};
///
/// let item = CatalogItem::new(ItemId(7), "Mug")
///     .with_prices(Money::from_cents(2500), Some(Money::from_cents(1800)));
/// assert!(item.is_on_sale());
/// assert_eq!(item.active_price(), Some(Money::from_cents(1800)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Item identifier.
    pub id: ItemId,
    /// Item title.
    pub title: String,
    /// URL of the item detail page.
    #[serde(default)]
    pub permalink: Option<String>,
    /// Regular price.
    #[serde(default)]
    pub regular_price: Option<Money>,
    /// Sale price, when the item is discounted.
    #[serde(default)]
    pub sale_price: Option<Money>,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// Stock information.
    #[serde(default)]
    pub stock: Option<Stock>,
    /// Main image.
    #[serde(default)]
    pub image: Option<ImageRef>,
    /// Publication date.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Short description.
    #[serde(default)]
    pub summary: Option<String>,
    /// Terms per taxonomy key.
    #[serde(default)]
    pub terms: BTreeMap<String, Vec<Term>>,
    /// Meta values per key.
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
    /// Whether the item can be added to a cart at all.
    #[serde(default = "default_purchasable")]
    pub purchasable: bool,
}

fn default_purchasable() -> bool {
    true
}

impl CatalogItem {
    /// Creates an item with only an id and a title.
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            permalink: None,
            regular_price: None,
            sale_price: None,
            sku: None,
            stock: None,
            image: None,
            date: None,
            summary: None,
            terms: BTreeMap::new(),
            meta: BTreeMap::new(),
            purchasable: true,
        }
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Sets the regular and sale price.
    pub fn with_prices(mut self, regular: Money, sale: Option<Money>) -> Self {
        self.regular_price = Some(regular);
        self.sale_price = sale;
        self
    }

    /// Sets the SKU.
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Sets the stock information.
    pub fn with_stock(mut self, stock: Stock) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Sets the permalink.
    pub fn with_permalink(mut self, url: impl Into<String>) -> Self {
        self.permalink = Some(url.into());
        self
    }

    /// Sets the main image.
    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    /// Sets the publication date.
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the short description.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Adds a term under a taxonomy key.
    pub fn with_term(mut self, taxonomy: impl Into<String>, term: Term) -> Self {
        self.terms.entry(taxonomy.into()).or_default().push(term);
        self
    }

    /// Sets a meta value.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Marks the item as not purchasable.
    pub fn not_purchasable(mut self) -> Self {
        self.purchasable = false;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the price a buyer pays: the sale price when present.
    pub fn active_price(&self) -> Option<Money> {
        self.sale_price.or(self.regular_price)
    }

    /// Returns `true` if a sale price is set.
    pub fn is_on_sale(&self) -> bool {
        self.sale_price.is_some()
    }

    /// Returns the item's terms for a taxonomy key.
    pub fn terms_for(&self, taxonomy: &str) -> &[Term] {
        self.terms.get(taxonomy).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if the item carries any of the given terms.
    pub fn has_any_term(&self, taxonomy: &str, terms: &[TermId]) -> bool {
        self.terms_for(taxonomy).iter().any(|t| terms.contains(&t.id))
    }

    /// Returns the meta value for a key.
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }

    /// Returns the stock status, treating untracked stock as in stock.
    pub fn stock_status(&self) -> StockStatus {
        self.stock.map(|s| s.status).unwrap_or(StockStatus::InStock)
    }
}
