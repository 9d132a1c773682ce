//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use chrono::TimeZone;
use chrono::Utc;
use prodtable_lib::catalog::Catalog;
use prodtable_lib::catalog::CatalogPage;
use prodtable_lib::catalog::CatalogQuery;
use prodtable_lib::catalog::CurrencyFormat;
use prodtable_lib::catalog::InMemoryCatalog;
use prodtable_lib::error::CatalogError;
use prodtable_lib::model::CatalogItem;
use prodtable_lib::model::Direction;
use prodtable_lib::model::ItemId;
use prodtable_lib::model::Money;
use prodtable_lib::model::Source;
use prodtable_lib::model::SourceKind;
use prodtable_lib::model::Term;

/// Number of items in [`fixture_catalog`].
pub const FIXTURE_ITEMS: u64 = 23;

/// Item `n` of the fixture catalog.
///
/// Odd items are mugs (category 12), even items are plates (category 14).
/// Every fifth item is on sale.
pub fn fixture_item(n: u64) -> CatalogItem {
    let (category, name) = if n % 2 == 1 { (12, "Mugs") } else { (14, "Plates") };
    let regular = Money::from_cents(1000 + n as i64 * 100);
    let sale = (n % 5 == 0).then(|| Money::from_cents(500 + n as i64 * 100));

    CatalogItem::new(ItemId(n), format!("Product {:02}", n))
        .with_sku(format!("SKU-{:02}", n))
        .with_prices(regular, sale)
        .with_permalink(format!("/product/{}", n))
        .with_date(Utc.with_ymd_and_hms(2024, 1, n as u32, 12, 0, 0).unwrap())
        .with_term("product_cat", Term::new(category, name))
}

/// A catalog of 23 items.
pub fn fixture_catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_items((1..=FIXTURE_ITEMS).map(fixture_item))
}

/// A source listing every item in id order.
pub fn all_by_title() -> Source {
    Source::new(SourceKind::All).with_sort("title", Direction::Asc)
}

/// Converts item ids to plain numbers.
pub fn ids(items: &[ItemId]) -> Vec<u64> {
    items.iter().map(|id| id.0).collect()
}

/// A catalog that counts calls and fails every query.
#[derive(Debug, Default, Clone)]
pub struct FailingCatalog {
    calls: Arc<AtomicUsize>,
}

impl FailingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for FailingCatalog {
    async fn query(&self, _query: &CatalogQuery) -> Result<CatalogPage, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CatalogError::unavailable("connection refused"))
    }

    async fn project(&self, _ids: &[ItemId]) -> Result<Vec<CatalogItem>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CatalogError::unavailable("connection refused"))
    }

    fn currency(&self) -> CurrencyFormat {
        CurrencyFormat::default()
    }
}

/// A fixture catalog whose calls take `latency` of (virtual) time.
pub fn slow_catalog(latency: Duration) -> InMemoryCatalog {
    fixture_catalog().with_latency(latency)
}
