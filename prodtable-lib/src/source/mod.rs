//! Source resolution
//!
//! Turns a [`Source`] into the ordered candidate ids of a table. The
//! resolver only decides *which* items and in *which base order*; search,
//! narrowing and pagination happen later in the
//! [`pipeline`](crate::pipeline).

use std::collections::HashSet;

use crate::catalog::CatalogContext;
use crate::catalog::CatalogQuery;
use crate::catalog::Filter;
use crate::catalog::OrderBy;
use crate::catalog::SortField;
use crate::error::CatalogError;
use crate::error::Diagnostic;
use crate::model::ItemId;
use crate::model::Source;
use crate::model::SourceKind;

/// The resolved candidate list of a source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Candidate ids in base order.
    pub items: Vec<ItemId>,
    /// Number of candidates.
    pub total: usize,
    /// Degeneracy signals raised while resolving.
    pub diagnostics: Vec<Diagnostic>,
}

/// The catalog query a source translates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// Nothing can match; the catalog is not called.
    Empty,
    /// Run this query.
    Query(CatalogQuery),
}

/// Translates a source into a catalog query.
///
/// Pure; returns the degeneracy diagnostics alongside the plan.
pub fn build_query(source: &Source) -> (QueryPlan, Vec<Diagnostic>) {
    let args = &source.query_args;
    let mut diagnostics = Vec::new();

    let mut query = CatalogQuery::new();
    match source.kind {
        SourceKind::All => {}
        SourceKind::Discounted => query = query.filter(Filter::OnSale),
        SourceKind::ByCategory => {
            if args.category_ids.is_empty() {
                diagnostics.push(Diagnostic::degeneracy(
                    "by-category source has no categories; no items can match",
                ));
                return (QueryPlan::Empty, diagnostics);
            }
            query = query.filter(Filter::in_terms(
                crate::model::CATEGORY_TAXONOMY,
                args.category_ids.iter().copied(),
            ));
            if !args.tag_ids.is_empty() {
                query = query.filter(Filter::in_terms(crate::model::TAG_TAXONOMY, args.tag_ids.iter().copied()));
            }
        }
        SourceKind::ExplicitList => {
            let ids = explicit_ids(source);
            if ids.is_empty() {
                diagnostics.push(Diagnostic::degeneracy("explicit-list source lists no items"));
                return (QueryPlan::Empty, diagnostics);
            }
            query = query.filter(Filter::ids(ids));
        }
    }

    if let Some(status) = args.stock_status {
        query = query.filter(Filter::stock_status(status));
    }
    if let Some(price) = Filter::price_in(&args.price_range) {
        query = query.filter(price);
    }

    if source.kind != SourceKind::ExplicitList {
        match SortField::from_native(&source.sort.field) {
            Some(field) => query = query.order_by(OrderBy::by(field, source.sort.direction)),
            None => diagnostics.push(Diagnostic::degeneracy(format!(
                "sort field '{}' is not catalog-native; using catalog default order",
                source.sort.field
            ))),
        }
    }

    (QueryPlan::Query(query), diagnostics)
}

/// Explicit ids in list order, first occurrence kept.
fn explicit_ids(source: &Source) -> Vec<ItemId> {
    let mut seen = HashSet::new();
    source
        .query_args
        .post_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Resolves a source against the catalog.
///
/// # Errors
///
/// Returns the catalog's error unchanged; degenerate sources are not
/// errors and resolve to fewer items with a diagnostic.
pub async fn resolve(source: &Source, context: &CatalogContext<'_>) -> Result<Resolution, CatalogError> {
    let (plan, mut diagnostics) = build_query(source);

    let query = match plan {
        QueryPlan::Empty => {
            return Ok(Resolution {
                items: Vec::new(),
                total: 0,
                diagnostics,
            });
        }
        QueryPlan::Query(query) => query,
    };

    log::debug!("Resolving {} source: {}", source.kind.as_str(), query);
    let page = context.query(&query).await?;

    let (mut items, mut total) = match source.kind {
        SourceKind::ExplicitList => {
            let found: HashSet<ItemId> = page.items.iter().copied().collect();
            let (items, unresolved): (Vec<ItemId>, Vec<ItemId>) =
                explicit_ids(source).into_iter().partition(|id| found.contains(id));
            if !unresolved.is_empty() {
                let ids: Vec<String> = unresolved.iter().map(|id| id.to_string()).collect();
                diagnostics.push(Diagnostic::degeneracy(format!(
                    "{} explicit-list ids did not resolve: [{}]",
                    unresolved.len(),
                    ids.join(", ")
                )));
            }
            let total = items.len();
            (items, total)
        }
        _ => (page.items, page.total),
    };

    let excludes = &source.query_args.excludes;
    if !excludes.is_empty() {
        let before = items.len();
        items.retain(|id| !excludes.contains(id));
        total = total.saturating_sub(before - items.len());
    }

    Ok(Resolution {
        items,
        total,
        diagnostics,
    })
}
