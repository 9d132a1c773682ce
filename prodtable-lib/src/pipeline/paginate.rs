//! Pagination step

use std::ops::Range;

use serde::Serialize;

use crate::model::PaginationPosition;

/// Pagination metadata of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page, 1-based, after clamping.
    pub page: usize,
    /// Rows per page.
    pub limit: usize,
    /// Total rows across all pages.
    pub total: usize,
    /// Number of pages; 0 when there are no rows.
    pub total_pages: usize,
    /// Where controls are shown.
    pub position: PaginationPosition,
}

impl PaginationMeta {
    /// Computes pagination for `total` rows.
    ///
    /// The requested page is clamped to `[1, max(1, total_pages)]`. When
    /// pagination is disabled every row is on page 1.
    pub fn compute(
        total: usize,
        limit: usize,
        requested: Option<usize>,
        enabled: bool,
        position: PaginationPosition,
    ) -> Self {
        if !enabled {
            return Self {
                page: 1,
                limit: total,
                total,
                total_pages: usize::from(total > 0),
                position,
            };
        }

        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit);
        let page = requested.unwrap_or(1).clamp(1, total_pages.max(1));
        Self {
            page,
            limit,
            total,
            total_pages,
            position,
        }
    }

    /// Returns the row range of the current page.
    pub fn range(&self) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.limit).min(self.total);
        let end = start.saturating_add(self.limit).min(self.total);
        start..end
    }

    /// Returns `true` if a next page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns `true` if a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slices the current page out of the rows.
pub fn apply<T>(mut rows: Vec<T>, meta: &PaginationMeta) -> Vec<T> {
    let range = meta.range();
    rows.truncate(range.end);
    rows.drain(..range.start);
    rows
}
