//! Catalog collaborator
//!
//! The catalog owns the product data. This module defines the
//! [`Catalog`] trait the pipeline queries through, the typed query
//! vocabulary ([`Filter`], [`OrderBy`], [`CatalogQuery`]), and an
//! [`InMemoryCatalog`] reference implementation.

mod currency;
mod filter;
mod memory;
mod order;
mod query;

pub use currency::*;
pub use filter::*;
pub use memory::*;
pub use order::*;
pub use query::*;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::model::CatalogItem;
use crate::model::ItemId;

/// The ids matched by a catalog query, in result order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    /// Matching item ids.
    pub items: Vec<ItemId>,
    /// Total number of matches.
    pub total: usize,
}

/// Trait for catalog backends.
///
/// Implementations must be deterministic: identical queries against an
/// unchanged catalog return identical pages.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Returns the ids matching a query.
    async fn query(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogError>;

    /// Returns the projections of the given items, in the requested order.
    ///
    /// Unknown ids are skipped.
    async fn project(&self, ids: &[ItemId]) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Returns the currency display rules.
    fn currency(&self) -> CurrencyFormat;
}

/// A catalog handle together with per-call limits.
#[derive(Clone, Copy)]
pub struct CatalogContext<'a> {
    catalog: &'a dyn Catalog,
    timeout: Option<Duration>,
}

impl<'a> CatalogContext<'a> {
    /// Creates a context without a call timeout.
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self { catalog, timeout: None }
    }

    /// Bounds every catalog call by a timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the currency display rules.
    pub fn currency(&self) -> CurrencyFormat {
        self.catalog.currency()
    }

    /// Runs a query, honouring the timeout.
    pub async fn query(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogError> {
        self.bounded(self.catalog.query(query)).await
    }

    /// Projects items, honouring the timeout.
    pub async fn project(&self, ids: &[ItemId]) -> Result<Vec<CatalogItem>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.bounded(self.catalog.project(ids)).await
    }

    async fn bounded<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, CatalogError>>,
    ) -> Result<T, CatalogError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| CatalogError::Timeout(limit))?,
            None => call.await,
        }
    }
}

impl std::fmt::Debug for CatalogContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogContext").field("timeout", &self.timeout).finish()
    }
}
