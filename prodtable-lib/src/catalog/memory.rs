//! In-memory catalog implementation

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::Catalog;
use super::CatalogPage;
use super::CatalogQuery;
use super::CurrencyFormat;
use super::OrderBy;
use super::SortField;
use crate::error::CatalogError;
use crate::model::CatalogItem;
use crate::model::Direction;
use crate::model::ItemId;

/// A catalog held entirely in memory.
///
/// Insertion order is the catalog's default order. Queries evaluate the
/// [`Filter`](super::Filter) vocabulary directly and sort stably.
///
/// # Example
///
/// ```
/// use prodtable_lib::catalog::InMemoryCatalog;
/// use prodtable_lib::model::{CatalogItem, ItemId};
///
/// let catalog = InMemoryCatalog::new()
///     .with_item(CatalogItem::new(ItemId(1), "Mug"))
///     .with_item(CatalogItem::new(ItemId(2), "Plate"));
/// assert_eq!(catalog.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    items: Vec<CatalogItem>,
    index: HashMap<ItemId, usize>,
    currency: CurrencyFormat,
    latency: Option<Duration>,
}

/// On-disk shape of a catalog fixture.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Full {
        #[serde(default)]
        currency: CurrencyFormat,
        items: Vec<CatalogItem>,
    },
    Items(Vec<CatalogItem>),
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog from items, in order.
    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        items.into_iter().fold(Self::new(), Self::with_item)
    }

    /// Loads a catalog from JSON.
    ///
    /// Accepts either an array of items or an object with `items` and an
    /// optional `currency`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let catalog = match serde_json::from_str(json)? {
            CatalogFile::Full { currency, items } => Self::from_items(items).with_currency(currency),
            CatalogFile::Items(items) => Self::from_items(items),
        };
        log::debug!("Loaded catalog with {} items", catalog.len());
        Ok(catalog)
    }

    /// Adds an item; an item with an existing id replaces it in place.
    pub fn with_item(mut self, item: CatalogItem) -> Self {
        match self.index.get(&item.id) {
            Some(&position) => self.items[position] = item,
            None => {
                self.index.insert(item.id, self.items.len());
                self.items.push(item);
            }
        }
        self
    }

    /// Sets the currency format.
    pub fn with_currency(mut self, currency: CurrencyFormat) -> Self {
        self.currency = currency;
        self
    }

    /// Delays every call by the given duration.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the catalog holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns an item by id.
    pub fn get(&self, id: ItemId) -> Option<&CatalogItem> {
        self.index.get(&id).map(|&position| &self.items[position])
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn compare(a: &CatalogItem, b: &CatalogItem, order: &OrderBy) -> Ordering {
    for (field, direction) in order.fields() {
        let ordering = match field {
            SortField::Date => directed(a.date.as_ref(), b.date.as_ref(), *direction),
            SortField::Price => directed(a.active_price().as_ref(), b.active_price().as_ref(), *direction),
            SortField::Title => {
                let (a, b) = (a.title.to_lowercase(), b.title.to_lowercase());
                directed(Some(&a), Some(&b), *direction)
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Compares optional keys; missing keys sort last in either direction.
fn directed<T: Ord>(a: Option<&T>, b: Option<&T>, direction: Direction) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            Direction::Asc => a.cmp(b),
            Direction::Desc => b.cmp(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn query(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogError> {
        self.simulate_latency().await;

        let mut matched: Vec<&CatalogItem> = self
            .items
            .iter()
            .filter(|item| query.conditions().is_none_or(|f| f.matches(item)))
            .collect();
        if let Some(order) = query.order() {
            matched.sort_by(|a, b| compare(a, b, order));
        }

        let items: Vec<ItemId> = matched.iter().map(|item| item.id).collect();
        log::trace!("[{}] matched {} items", query, items.len());
        Ok(CatalogPage {
            total: items.len(),
            items,
        })
    }

    async fn project(&self, ids: &[ItemId]) -> Result<Vec<CatalogItem>, CatalogError> {
        self.simulate_latency().await;
        Ok(ids.iter().filter_map(|id| self.get(*id)).cloned().collect())
    }

    fn currency(&self) -> CurrencyFormat {
        self.currency.clone()
    }
}
