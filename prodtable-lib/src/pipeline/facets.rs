//! Taxonomy filter facets

use std::collections::BTreeMap;

use serde::Serialize;

use super::TermFilter;
use crate::model::CatalogItem;
use crate::model::TermId;

/// One selectable term of a facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetTerm {
    /// Term identifier.
    pub id: TermId,
    /// Display name.
    pub name: String,
    /// Number of candidates carrying the term.
    pub count: usize,
    /// Whether the request currently filters by this term.
    pub selected: bool,
}

/// The distinct terms of one taxonomy among the candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    /// Taxonomy key.
    pub taxonomy: String,
    /// Terms, most frequent first, then by name.
    pub terms: Vec<FacetTerm>,
}

/// Collects facets for each taxonomy over the candidates.
pub fn collect_facets(items: &[CatalogItem], taxonomies: &[String], selected: &[&TermFilter]) -> Vec<Facet> {
    taxonomies
        .iter()
        .map(|taxonomy| {
            let mut counts: BTreeMap<TermId, (String, usize)> = BTreeMap::new();
            for item in items {
                for term in item.terms_for(taxonomy) {
                    counts.entry(term.id).or_insert_with(|| (term.name.clone(), 0)).1 += 1;
                }
            }

            let is_selected = |id: TermId| {
                selected
                    .iter()
                    .any(|f| &f.taxonomy == taxonomy && f.terms.contains(&id))
            };
            let mut terms: Vec<FacetTerm> = counts
                .into_iter()
                .map(|(id, (name, count))| FacetTerm {
                    id,
                    name,
                    count,
                    selected: is_selected(id),
                })
                .collect();
            terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

            Facet {
                taxonomy: taxonomy.clone(),
                terms,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemId;
    use crate::model::Term;

    #[test]
    fn test_counts_and_selection() {
        let items = vec![
            CatalogItem::new(ItemId(1), "a").with_term("product_cat", Term::new(1, "Mugs")),
            CatalogItem::new(ItemId(2), "b")
                .with_term("product_cat", Term::new(2, "Bowls"))
                .with_term("product_cat", Term::new(1, "Mugs")),
            CatalogItem::new(ItemId(3), "c").with_term("product_cat", Term::new(3, "Cups")),
        ];
        let filter = TermFilter::new("product_cat", [3]);
        let facets = collect_facets(&items, &["product_cat".to_string()], &[&filter]);
        let terms = &facets[0].terms;
        assert_eq!(terms.len(), 3);
        assert_eq!((terms[0].name.as_str(), terms[0].count), ("Mugs", 2));
        assert_eq!(terms[1].name, "Bowls");
        assert!(terms[2].selected);
    }
}
