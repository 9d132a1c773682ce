//! Sort override step

use std::cmp::Ordering;

use crate::model::CatalogItem;
use crate::model::ColumnKind;
use crate::model::Direction;
use crate::model::StockStatus;
use crate::model::Value;

/// Returns the sort key a column type derives from an item.
///
/// Returns `None` for types that cannot be sorted by.
pub fn sort_key(kind: &ColumnKind, item: &CatalogItem) -> Option<Value> {
    let key = match kind {
        ColumnKind::Name(_) => Value::String(item.title.clone()),
        ColumnKind::Price => item.active_price().map(|p| Value::Decimal(p.value())).unwrap_or_default(),
        ColumnKind::Sku => item.sku.clone().map(Value::String).unwrap_or_default(),
        ColumnKind::Stock => match item.stock {
            Some(stock) => Value::Int(match (stock.status, stock.quantity) {
                (StockStatus::InStock, Some(quantity)) => quantity,
                (StockStatus::InStock, None) => i64::MAX,
                (StockStatus::OnBackorder, _) => -1,
                (StockStatus::OutOfStock, _) => i64::MIN,
            }),
            None => Value::Null,
        },
        ColumnKind::Date(_) => item.date.map(Value::DateTime).unwrap_or_default(),
        ColumnKind::Summary(_) => item.summary.clone().map(Value::String).unwrap_or_default(),
        ColumnKind::Taxonomy(settings) => Value::List(
            item.terms_for(&settings.taxonomy)
                .iter()
                .map(|t| Value::String(t.name.clone()))
                .collect(),
        ),
        ColumnKind::CustomField(settings) => item.meta(&settings.meta_key).cloned().unwrap_or_default(),
        ColumnKind::Image(_) | ColumnKind::AddToCart | ColumnKind::Combined(_) | ColumnKind::Unsupported(_) => {
            return None;
        }
    };
    Some(key)
}

/// Stably sorts items by a column's key; blank keys sort last either way.
pub fn apply(mut items: Vec<CatalogItem>, kind: &ColumnKind, direction: Direction) -> Vec<CatalogItem> {
    if !kind.is_sortable() {
        return items;
    }
    let mut keyed: Vec<(Value, CatalogItem)> = items
        .drain(..)
        .map(|item| (sort_key(kind, &item).unwrap_or_default(), item))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare(a, b, direction));
    keyed.into_iter().map(|(_, item)| item).collect()
}

fn compare(a: &Value, b: &Value, direction: Direction) -> Ordering {
    match (a.is_blank(), b.is_blank(), direction) {
        (false, false, Direction::Desc) => b.sort_cmp(a),
        _ => a.sort_cmp(b),
    }
}
