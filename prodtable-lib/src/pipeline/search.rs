//! Free-text search step

use crate::model::CatalogItem;

/// Keeps items whose title or SKU contains the term, case-insensitively.
pub fn apply(items: Vec<CatalogItem>, term: &str) -> Vec<CatalogItem> {
    let needle = term.to_lowercase();
    items.into_iter().filter(|item| matches(item, &needle)).collect()
}

fn matches(item: &CatalogItem, needle: &str) -> bool {
    item.title.to_lowercase().contains(needle)
        || item.sku.as_deref().is_some_and(|sku| sku.to_lowercase().contains(needle))
}
