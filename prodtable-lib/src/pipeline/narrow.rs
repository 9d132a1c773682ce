//! Narrowing step: runtime price range and taxonomy terms

use super::TermFilter;
use crate::model::CatalogItem;
use crate::model::PriceRange;

/// Keeps items whose active price lies in the range.
///
/// Items without a price never pass a bounded range.
pub fn price(items: Vec<CatalogItem>, range: &PriceRange) -> Vec<CatalogItem> {
    if range.is_unbounded() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| item.active_price().is_some_and(|p| range.contains(p.value())))
        .collect()
}

/// Keeps items that satisfy every term filter.
pub fn terms(items: Vec<CatalogItem>, filters: &[&TermFilter]) -> Vec<CatalogItem> {
    if filters.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| filters.iter().all(|f| item.has_any_term(&f.taxonomy, &f.terms)))
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::model::ItemId;
    use crate::model::Money;
    use crate::model::Term;

    #[test]
    fn test_price_uses_active_price() {
        let items = vec![
            CatalogItem::new(ItemId(1), "a").with_prices(Money::from_int(30), Some(Money::from_int(12))),
            CatalogItem::new(ItemId(2), "b").with_prices(Money::from_int(30), None),
            CatalogItem::new(ItemId(3), "c"),
        ];
        let range = PriceRange::new(Some(Decimal::new(10, 0)), Some(Decimal::new(20, 0)));
        let ids: Vec<ItemId> = price(items, &range).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ItemId(1)]);
    }

    #[test]
    fn test_all_term_filters_must_pass() {
        let items = vec![
            CatalogItem::new(ItemId(1), "a")
                .with_term("product_cat", Term::new(1, "x"))
                .with_term("pa_color", Term::new(7, "red")),
            CatalogItem::new(ItemId(2), "b").with_term("product_cat", Term::new(1, "x")),
        ];
        let category = TermFilter::new("product_cat", [1, 2]);
        let color = TermFilter::new("pa_color", [7]);
        let ids: Vec<ItemId> = terms(items, &[&category, &color]).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ItemId(1)]);
    }
}
