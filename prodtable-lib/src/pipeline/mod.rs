//! Feature pipeline
//!
//! Applies the runtime features to resolved candidates in a fixed order:
//!
//! 1. free-text search
//! 2. narrowing (price range, taxonomy terms)
//! 3. sort override
//! 4. pagination
//! 5. row decoration (bulk select, cart actions)
//!
//! Every step is a pure function of its inputs. Request parameters a
//! definition does not allow are ignored with a
//! [`IgnoredParameter`](crate::error::DiagnosticKind::IgnoredParameter)
//! diagnostic.

mod cart;
mod decorate;
mod facets;
pub mod layout;
pub mod narrow;
pub mod paginate;
mod params;
pub mod search;
pub mod sort;

pub use cart::*;
pub use decorate::*;
pub use facets::*;
pub use layout::*;
pub use paginate::PaginationMeta;
pub use params::*;

use crate::error::Diagnostic;
use crate::model::CatalogItem;
use crate::model::Column;
use crate::model::Direction;
use crate::model::ItemId;
use crate::model::PriceRange;
use crate::model::TableDefinition;

/// A sort override that passed validation.
#[derive(Debug, Clone, Copy)]
struct ActiveSort<'a> {
    column: &'a Column,
    direction: Direction,
}

/// The request parameters a definition admits, validated once.
#[derive(Debug)]
pub struct FeaturePipeline<'a> {
    definition: &'a TableDefinition,
    params: &'a RequestParams,
    search: Option<&'a str>,
    price_range: Option<PriceRange>,
    term_filters: Vec<&'a TermFilter>,
    sort: Option<ActiveSort<'a>>,
    diagnostics: Vec<Diagnostic>,
}

/// The page of rows produced by the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Items of the current page, in display order.
    pub rows: Vec<CatalogItem>,
    /// Decoration of each row.
    pub decorations: Vec<RowDecoration>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
    /// Taxonomy facets, when filters are enabled.
    pub facets: Vec<Facet>,
    /// Ignored-parameter diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> FeaturePipeline<'a> {
    /// Validates request parameters against a definition.
    pub fn new(definition: &'a TableDefinition, params: &'a RequestParams) -> Self {
        let features = &definition.settings.features;
        let mut diagnostics = Vec::new();

        let search = match params.search() {
            Some(term) if features.search => Some(term),
            Some(_) => {
                diagnostics.push(Diagnostic::ignored("search is disabled for this table"));
                None
            }
            None => None,
        };

        let price_range = match params.price_range {
            Some(range) if range.is_unbounded() => None,
            Some(_) if !features.price_range => {
                diagnostics.push(Diagnostic::ignored("price filtering is disabled for this table"));
                None
            }
            Some(PriceRange {
                min: Some(min),
                max: Some(max),
            }) if min > max => {
                diagnostics.push(Diagnostic::ignored(format!(
                    "price range minimum {} exceeds maximum {}",
                    min, max
                )));
                None
            }
            other => other,
        };

        let filters = &definition.settings.filters;
        let mut term_filters = Vec::new();
        for filter in &params.term_filters {
            if filters.is_active(&filter.taxonomy) {
                term_filters.push(filter);
            } else {
                diagnostics.push(Diagnostic::ignored(format!(
                    "'{}' is not a filter taxonomy of this table",
                    filter.taxonomy
                )));
            }
        }

        let sort = params
            .sort_override
            .as_ref()
            .and_then(|sort| match definition.column(&sort.column) {
                _ if !features.sorting => {
                    diagnostics.push(Diagnostic::ignored("sorting is disabled for this table"));
                    None
                }
                None => {
                    diagnostics.push(Diagnostic::ignored(format!("unknown sort column '{}'", sort.column)));
                    None
                }
                Some(column) if !column.kind.is_sortable() => {
                    diagnostics.push(Diagnostic::ignored(format!(
                        "column '{}' of type {} cannot be sorted",
                        column.id,
                        column.kind.type_name()
                    )));
                    None
                }
                Some(column) => Some(ActiveSort {
                    column,
                    direction: sort.direction,
                }),
            });

        Self {
            definition,
            params,
            search,
            price_range,
            term_filters,
            sort,
            diagnostics,
        }
    }

    /// Returns `true` if any step needs item data before pagination.
    ///
    /// When `false`, only the ids of the current page need projecting.
    pub fn requires_projection(&self) -> bool {
        self.search.is_some()
            || self.price_range.is_some()
            || !self.term_filters.is_empty()
            || self.sort.is_some()
            || self.definition.settings.filters.enabled
    }

    /// Computes pagination for a candidate count.
    pub fn pagination(&self, total: usize) -> PaginationMeta {
        let settings = &self.definition.settings;
        PaginationMeta::compute(
            total,
            settings.pagination.limit,
            self.params.page,
            settings.features.pagination,
            settings.pagination.position,
        )
    }

    /// Returns the ids of the current page when no projection is required.
    pub fn page_ids(&self, ids: &[ItemId], total: usize) -> (Vec<ItemId>, PaginationMeta) {
        let meta = self.pagination(total);
        let range = meta.range();
        let end = range.end.min(ids.len());
        let start = range.start.min(end);
        (ids[start..end].to_vec(), meta)
    }

    /// Runs every step over projected candidates.
    pub fn run(&self, candidates: Vec<CatalogItem>) -> PipelineOutput {
        let mut items = candidates;

        if let Some(term) = self.search {
            items = search::apply(items, term);
        }
        if let Some(range) = &self.price_range {
            items = narrow::price(items, range);
        }

        let filters = &self.definition.settings.filters;
        let facets = if filters.enabled {
            collect_facets(&items, &filters.taxonomies, &self.term_filters)
        } else {
            Vec::new()
        };
        items = narrow::terms(items, &self.term_filters);

        if let Some(sort) = self.sort {
            items = sort::apply(items, &sort.column.kind, sort.direction);
        }

        let pagination = self.pagination(items.len());
        let rows = paginate::apply(items, &pagination);
        let decorations = self.decorate(&rows);

        log::trace!(
            "Pipeline produced page {}/{} with {} rows",
            pagination.page,
            pagination.total_pages,
            rows.len()
        );

        PipelineOutput {
            rows,
            decorations,
            pagination,
            facets,
            diagnostics: self.diagnostics.clone(),
        }
    }

    /// Decorates rows that were paginated without running the pipeline.
    pub fn finish(&self, rows: Vec<CatalogItem>, pagination: PaginationMeta) -> PipelineOutput {
        let decorations = self.decorate(&rows);
        PipelineOutput {
            rows,
            decorations,
            pagination,
            facets: Vec::new(),
            diagnostics: self.diagnostics.clone(),
        }
    }

    fn decorate(&self, rows: &[CatalogItem]) -> Vec<RowDecoration> {
        rows.iter()
            .map(|item| decorate(item, &self.definition.settings))
            .collect()
    }

    /// Returns the ignored-parameter diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::error::DiagnosticKind;
    use crate::model::ColumnKind;
    use crate::model::Money;
    use crate::model::NameSettings;
    use crate::model::Term;

    fn definition() -> TableDefinition {
        let mut definition = TableDefinition::default().with_columns(vec![
            Column::new("name", ColumnKind::Name(NameSettings::default())),
            Column::new("price", ColumnKind::Price),
            Column::new("buy", ColumnKind::AddToCart),
        ]);
        definition.settings.pagination.limit = 2;
        definition.settings.features.price_range = true;
        definition.settings.filters.enabled = true;
        definition.settings.filters.taxonomies = vec!["product_cat".to_string()];
        definition
    }

    fn items() -> Vec<CatalogItem> {
        (1..=5)
            .map(|n| {
                CatalogItem::new(ItemId(n), format!("Mug {}", 6 - n))
                    .with_prices(Money::from_int(n as i64), None)
                    .with_term("product_cat", Term::new(n % 2, "Cat"))
            })
            .collect()
    }

    #[test]
    fn test_steps_compose_in_order() {
        let definition = definition();
        let params = RequestParams::new()
            .with_search("MUG")
            .with_price_range(PriceRange::new(Some(Decimal::new(2, 0)), None))
            .with_term_filter(TermFilter::new("product_cat", [1]))
            .with_sort("name:asc".parse().unwrap());
        let pipeline = FeaturePipeline::new(&definition, &params);
        assert!(pipeline.requires_projection());

        let output = pipeline.run(items());
        // price >= 2 and odd term: items 3 and 5; by name asc "Mug 1" (5) then "Mug 3" (3)
        let ids: Vec<ItemId> = output.rows.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ItemId(5), ItemId(3)]);
        assert_eq!(output.pagination.total, 2);
        assert_eq!(output.decorations.len(), 2);
        assert!(output.diagnostics.is_empty());
        // facets are counted before term narrowing
        assert_eq!(output.facets[0].terms.len(), 2);
    }

    #[test]
    fn test_disallowed_params_are_ignored_with_diagnostics() {
        let mut definition = definition();
        definition.settings.features.search = false;
        definition.settings.features.sorting = true;
        let params = RequestParams::new()
            .with_search("mug")
            .with_sort(SortOverride::new("buy", Direction::Asc))
            .with_term_filter(TermFilter::new("pa_color", [1]));
        let pipeline = FeaturePipeline::new(&definition, &params);
        assert_eq!(pipeline.diagnostics().len(), 3);
        assert!(pipeline
            .diagnostics()
            .iter()
            .all(|d| d.kind == DiagnosticKind::IgnoredParameter));

        let output = pipeline.run(items());
        assert_eq!(output.pagination.total, 5);
    }

    #[test]
    fn test_unknown_sort_column_is_ignored() {
        let definition = definition();
        let params = RequestParams::new().with_sort(SortOverride::new("rating", Direction::Desc));
        let pipeline = FeaturePipeline::new(&definition, &params);
        assert_eq!(pipeline.diagnostics().len(), 1);
    }

    #[test]
    fn test_page_ids_without_projection() {
        let mut definition = definition();
        definition.settings.filters.enabled = false;
        let params = RequestParams::new().with_page(9);
        let pipeline = FeaturePipeline::new(&definition, &params);
        assert!(!pipeline.requires_projection());

        let ids: Vec<ItemId> = (1..=5).map(ItemId).collect();
        let (page, meta) = pipeline.page_ids(&ids, ids.len());
        assert_eq!(page, vec![ItemId(5)]);
        assert_eq!((meta.page, meta.total_pages), (3, 3));
    }
}
