//! Runtime request parameters

use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;
use crate::model::Direction;
use crate::model::PriceRange;
use crate::model::TermId;

/// A runtime sort override targeting a column.
///
/// Overrides are never persisted into the definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOverride {
    /// Column identifier.
    pub column: String,
    /// Sort direction.
    #[serde(default = "ascending")]
    pub direction: Direction,
}

fn ascending() -> Direction {
    Direction::Asc
}

impl SortOverride {
    /// Creates a sort override.
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

impl FromStr for SortOverride {
    type Err = ConfigError;

    /// Parses `column` or `column:asc|desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.rsplit_once(':') {
            Some((column, direction)) => {
                let direction = Direction::parse(direction)
                    .ok_or_else(|| ConfigError::new("sort", format!("unknown direction '{}'", direction)))?;
                (column, direction)
            }
            None => (s, Direction::Asc),
        };
        let column = column.trim();
        if column.is_empty() {
            return Err(ConfigError::new("sort", "missing column"));
        }
        Ok(Self::new(column, direction))
    }
}

/// A runtime narrowing by taxonomy terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFilter {
    /// Taxonomy key; must be an active filter taxonomy.
    pub taxonomy: String,
    /// Accepted terms; an item matches if it carries any of them.
    pub terms: Vec<TermId>,
}

impl TermFilter {
    /// Creates a term filter.
    pub fn new(taxonomy: impl Into<String>, terms: impl IntoIterator<Item = u64>) -> Self {
        Self {
            taxonomy: taxonomy.into(),
            terms: terms.into_iter().map(TermId).collect(),
        }
    }
}

/// Immutable per-request input of a render.
///
/// # Example
///
/// ```
/// use prodtable_lib::pipeline::RequestParams;
///
/// let params = RequestParams::new()
///     .with_page(2)
///     .with_search("mug")
///     .with_sort("price:desc".parse().unwrap());
/// assert_eq!(params.page, Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestParams {
    /// Requested page, 1-based.
    pub page: Option<usize>,
    /// Free-text search term.
    pub search_term: Option<String>,
    /// Sort override.
    pub sort_override: Option<SortOverride>,
    /// Runtime price bounds.
    pub price_range: Option<PriceRange>,
    /// Runtime taxonomy term filters.
    pub term_filters: Vec<TermFilter>,
}

impl RequestParams {
    /// Creates empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the search term.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Sets the sort override.
    pub fn with_sort(mut self, sort: SortOverride) -> Self {
        self.sort_override = Some(sort);
        self
    }

    /// Sets the runtime price bounds.
    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    /// Adds a term filter.
    pub fn with_term_filter(mut self, filter: TermFilter) -> Self {
        self.term_filters.push(filter);
        self
    }

    /// Returns the trimmed search term, if it is not blank.
    pub fn search(&self) -> Option<&str> {
        self.search_term.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_override_from_str() {
        assert_eq!(
            "price:desc".parse::<SortOverride>().unwrap(),
            SortOverride::new("price", Direction::Desc)
        );
        assert_eq!("name".parse::<SortOverride>().unwrap(), SortOverride::new("name", Direction::Asc));
        assert!("price:sideways".parse::<SortOverride>().is_err());
        assert!(":asc".parse::<SortOverride>().is_err());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let params: RequestParams = serde_json::from_value(serde_json::json!({
            "page": 3,
            "searchTerm": "mug",
            "sortOverride": {"column": "price"},
            "termFilters": [{"taxonomy": "product_cat", "terms": [4]}]
        }))
        .unwrap();
        assert_eq!(params.page, Some(3));
        assert_eq!(params.sort_override, Some(SortOverride::new("price", Direction::Asc)));
        assert_eq!(params.term_filters[0].terms, vec![TermId(4)]);
    }

    #[test]
    fn test_blank_search_is_none() {
        assert_eq!(RequestParams::new().with_search("   ").search(), None);
        assert_eq!(RequestParams::new().with_search(" mug ").search(), Some("mug"));
    }
}
