//! Catalog query builder

use super::Filter;
use super::OrderBy;

/// A query against the catalog.
///
/// A query without a filter matches every item; a query without an order
/// returns items in the catalog's default order.
///
/// # Example
///
/// ```
/// use prodtable_lib::catalog::{CatalogQuery, Filter, OrderBy, SortField};
///
/// let query = CatalogQuery::new()
///     .filter(Filter::OnSale)
///     .filter(Filter::in_categories([3]))
///     .order_by(OrderBy::asc(SortField::Price));
/// assert!(query.order().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    filter: Option<Filter>,
    order: Option<OrderBy>,
}

impl CatalogQuery {
    /// Creates a query matching every item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter; repeated calls are combined with AND.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and_also(filter),
            None => filter,
        });
        self
    }

    /// Sets the ordering.
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    /// Returns the combined filter.
    pub fn conditions(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Returns the ordering.
    pub fn order(&self) -> Option<&OrderBy> {
        self.order.as_ref()
    }
}

impl std::fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.filter {
            Some(filter) => write!(f, "where {}", filter)?,
            None => write!(f, "all")?,
        }
        if let Some(order) = &self.order {
            write!(f, " order by {}", order)?;
        }
        Ok(())
    }
}
