//! Column layout: render order and responsive visibility

use serde::Serialize;

use crate::model::Column;

/// A column slot in render order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSlot {
    /// Position of the column in the definition's list.
    pub index: usize,
    /// Column identifier.
    pub id: String,
    /// Visibility classes applied to the heading and every cell.
    pub classes: Vec<String>,
}

/// Orders columns by `advanced.order`, list position breaking ties.
pub fn layout(columns: &[Column]) -> Vec<ColumnSlot> {
    let mut order: Vec<(usize, &Column)> = columns.iter().enumerate().collect();
    order.sort_by_key(|(index, column)| (column.advanced.order, *index));
    order
        .into_iter()
        .map(|(index, column)| ColumnSlot {
            index,
            id: column.id.clone(),
            classes: column_classes(column),
        })
        .collect()
}

fn column_classes(column: &Column) -> Vec<String> {
    let mut classes = vec![format!("pt-col-{}", column.kind.type_name())];
    classes.extend(column.advanced.visibility.classes().iter().map(|c| c.to_string()));
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnKind;
    use crate::model::Visibility;

    #[test]
    fn test_stable_order_with_ties() {
        let columns = vec![
            Column::new("a", ColumnKind::Sku).with_order(2),
            Column::new("b", ColumnKind::Price).with_order(1),
            Column::new("c", ColumnKind::Stock).with_order(2),
            Column::new("d", ColumnKind::AddToCart).with_order(-5),
        ];
        let ids: Vec<String> = layout(&columns).into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_visibility_classes() {
        let columns = vec![Column::new("sku", ColumnKind::Sku).with_visibility(Visibility::Desktop)];
        assert_eq!(
            layout(&columns)[0].classes,
            vec!["pt-col-sku", "pt-hide-tablet", "pt-hide-mobile"]
        );
    }
}
