//! Filter vocabulary for catalog queries.

use rust_decimal::Decimal;

use crate::model::CatalogItem;
use crate::model::ItemId;
use crate::model::PriceRange;
use crate::model::StockStatus;
use crate::model::TermId;
use crate::model::CATEGORY_TAXONOMY;
use crate::model::TAG_TAXONOMY;

/// A filter condition over catalog items.
///
/// Filters combine with [`Filter::and_also`] and [`Filter::or_else`]; a
/// catalog backend may translate them into its own query language or
/// evaluate them directly with [`Filter::matches`].
///
/// # Example
///
/// ```
/// use prodtable_lib::catalog::Filter;
/// use prodtable_lib::model::StockStatus;
///
/// let filter = Filter::in_categories([12, 14])
///     .and_also(Filter::stock_status(StockStatus::InStock))
///     .and_also(Filter::OnSale);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// The item carries at least one of the terms in the taxonomy.
    InTerms {
        /// Taxonomy key.
        taxonomy: String,
        /// Accepted terms.
        terms: Vec<TermId>,
    },
    /// The item has this stock status.
    StockStatus(StockStatus),
    /// The active price is at least this value.
    PriceAtLeast(Decimal),
    /// The active price is at most this value.
    PriceAtMost(Decimal),
    /// The item has a sale price.
    OnSale,
    /// The item is one of these ids.
    Ids(Vec<ItemId>),
    /// Every filter matches.
    And(Vec<Filter>),
    /// At least one filter matches.
    Or(Vec<Filter>),
    /// The filter does not match.
    Not(Box<Filter>),
}

impl Filter {
    /// Creates a taxonomy term filter.
    pub fn in_terms(taxonomy: impl Into<String>, terms: impl IntoIterator<Item = TermId>) -> Self {
        Filter::InTerms {
            taxonomy: taxonomy.into(),
            terms: terms.into_iter().collect(),
        }
    }

    /// Creates a product category filter.
    pub fn in_categories(terms: impl IntoIterator<Item = u64>) -> Self {
        Self::in_terms(CATEGORY_TAXONOMY, terms.into_iter().map(TermId))
    }

    /// Creates a product tag filter.
    pub fn in_tags(terms: impl IntoIterator<Item = u64>) -> Self {
        Self::in_terms(TAG_TAXONOMY, terms.into_iter().map(TermId))
    }

    /// Creates a stock status filter.
    pub fn stock_status(status: StockStatus) -> Self {
        Filter::StockStatus(status)
    }

    /// Creates an id membership filter.
    pub fn ids(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Filter::Ids(ids.into_iter().collect())
    }

    /// Creates the filter for a price range, or `None` if it is unbounded.
    pub fn price_in(range: &PriceRange) -> Option<Self> {
        match (range.min, range.max) {
            (None, None) => None,
            (Some(min), None) => Some(Filter::PriceAtLeast(min)),
            (None, Some(max)) => Some(Filter::PriceAtMost(max)),
            (Some(min), Some(max)) => Some(Filter::and([Filter::PriceAtLeast(min), Filter::PriceAtMost(max)])),
        }
    }

    /// Creates a logical AND of multiple filters.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    /// Creates a logical OR of multiple filters.
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    /// Negates this filter.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Filter::Not(Box::new(self))
    }

    /// Combines this filter with another using logical AND.
    pub fn and_also(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            _ => Filter::And(vec![self, other]),
        }
    }

    /// Combines this filter with another using logical OR.
    pub fn or_else(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            _ => Filter::Or(vec![self, other]),
        }
    }

    /// Evaluates the filter against an item.
    ///
    /// Price comparisons use the active price; an item without any price
    /// never satisfies a price bound. An empty `And` matches everything, an
    /// empty `Or` nothing.
    pub fn matches(&self, item: &CatalogItem) -> bool {
        match self {
            Filter::InTerms { taxonomy, terms } => item.has_any_term(taxonomy, terms),
            Filter::StockStatus(status) => item.stock_status() == *status,
            Filter::PriceAtLeast(min) => item.active_price().is_some_and(|p| p.value() >= *min),
            Filter::PriceAtMost(max) => item.active_price().is_some_and(|p| p.value() <= *max),
            Filter::OnSale => item.is_on_sale(),
            Filter::Ids(ids) => ids.contains(&item.id),
            Filter::And(filters) => filters.iter().all(|f| f.matches(item)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(item)),
            Filter::Not(filter) => !filter.matches(item),
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn join(f: &mut std::fmt::Formatter<'_>, filters: &[Filter], op: &str) -> std::fmt::Result {
            write!(f, "(")?;
            for (i, filter) in filters.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", op)?;
                }
                write!(f, "{}", filter)?;
            }
            write!(f, ")")
        }

        match self {
            Filter::InTerms { taxonomy, terms } => {
                let terms: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
                write!(f, "{} in [{}]", taxonomy, terms.join(","))
            }
            Filter::StockStatus(status) => write!(f, "stock = {}", status.as_str()),
            Filter::PriceAtLeast(min) => write!(f, "price >= {}", min),
            Filter::PriceAtMost(max) => write!(f, "price <= {}", max),
            Filter::OnSale => write!(f, "on_sale"),
            Filter::Ids(ids) => {
                let ids: Vec<String> = ids.iter().map(|i| i.to_string()).collect();
                write!(f, "id in [{}]", ids.join(","))
            }
            Filter::And(filters) => join(f, filters, "and"),
            Filter::Or(filters) => join(f, filters, "or"),
            Filter::Not(filter) => write!(f, "not {}", filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Money;
    use crate::model::Stock;
    use crate::model::Term;

    fn mug() -> CatalogItem {
        CatalogItem::new(ItemId(1), "Mug")
            .with_prices(Money::from_int(10), Some(Money::from_int(8)))
            .with_term(CATEGORY_TAXONOMY, Term::new(5, "Kitchen"))
            .with_stock(Stock::new(StockStatus::InStock))
    }

    #[test]
    fn test_price_bounds_use_active_price() {
        let item = mug();
        assert!(Filter::PriceAtMost(Decimal::new(8, 0)).matches(&item));
        assert!(!Filter::PriceAtLeast(Decimal::new(9, 0)).matches(&item));
    }

    #[test]
    fn test_combinators() {
        let item = mug();
        let filter = Filter::in_categories([5])
            .and_also(Filter::OnSale)
            .and_also(Filter::stock_status(StockStatus::OutOfStock).not());
        assert!(filter.matches(&item));
        assert!(!Filter::in_categories([6]).or_else(Filter::ids([ItemId(2)])).matches(&item));
        assert!(Filter::and([]).matches(&item));
        assert!(!Filter::or([]).matches(&item));
    }

    #[test]
    fn test_price_in_unbounded_is_none() {
        assert_eq!(Filter::price_in(&PriceRange::default()), None);
        let range = PriceRange::new(Some(Decimal::new(1, 0)), Some(Decimal::new(2, 0)));
        assert_eq!(
            Filter::price_in(&range).map(|f| f.to_string()).as_deref(),
            Some("(price >= 1 and price <= 2)")
        );
    }
}
