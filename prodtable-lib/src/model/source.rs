//! Source specification: which catalog items a table includes

use rust_decimal::Decimal;
use serde::Serialize;

use super::ItemId;
use super::StockStatus;
use super::TermId;

/// The closed set of source kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Every catalog item.
    #[default]
    All,
    /// Items with a sale price.
    Discounted,
    /// Items in the given categories (and tags).
    ByCategory,
    /// Items listed explicitly, in list order.
    ExplicitList,
}

impl SourceKind {
    /// Accepted string values.
    pub const VALUES: &'static [&'static str] = &["all", "discounted", "by-category", "explicit-list"];

    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "discounted" => Some(Self::Discounted),
            "by-category" => Some(Self::ByCategory),
            "explicit-list" => Some(Self::ExplicitList),
            _ => None,
        }
    }

    /// Returns the persisted string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Discounted => "discounted",
            Self::ByCategory => "by-category",
            Self::ExplicitList => "explicit-list",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    #[default]
    Desc,
}

impl Direction {
    /// Parses `asc`/`desc`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Returns the persisted string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// An inclusive price range; `None` bounds are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
pub struct PriceRange {
    /// Lower bound.
    pub min: Option<Decimal>,
    /// Upper bound.
    pub max: Option<Decimal>,
}

impl PriceRange {
    /// Creates a range with both bounds optional.
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    /// Returns `true` if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Returns `true` if the price lies within the range.
    pub fn contains(&self, price: Decimal) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }
}

/// The query-argument bag of a [`Source`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryArgs {
    /// Category term ids (used by `by-category`).
    pub category_ids: Vec<TermId>,
    /// Tag term ids (used by `by-category`).
    pub tag_ids: Vec<TermId>,
    /// Explicit item ids, in display order (used by `explicit-list`).
    pub post_ids: Vec<ItemId>,
    /// Item ids removed after resolution, for every kind.
    pub excludes: Vec<ItemId>,
    /// Only items with this stock status.
    pub stock_status: Option<StockStatus>,
    /// Only items whose active price is in this range.
    pub price_range: PriceRange,
}

/// Sort specification of a [`Source`].
///
/// `field` is free text: catalog-native fields are honoured, anything else
/// is ignored at resolve time with a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    /// Field to sort by.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}

impl SortSpec {
    /// Creates a sort specification.
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new("date", Direction::Desc)
    }
}

/// Describes which catalog items to include.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Source kind.
    pub kind: SourceKind,
    /// Query arguments.
    pub query_args: QueryArgs,
    /// Sort specification.
    pub sort: SortSpec,
}

impl Source {
    /// Creates a source of the given kind with default arguments.
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Creates a `by-category` source.
    pub fn by_category(categories: impl IntoIterator<Item = u64>) -> Self {
        let mut source = Self::new(SourceKind::ByCategory);
        source.query_args.category_ids = categories.into_iter().map(TermId).collect();
        source
    }

    /// Creates an `explicit-list` source.
    pub fn explicit(ids: impl IntoIterator<Item = u64>) -> Self {
        let mut source = Self::new(SourceKind::ExplicitList);
        source.query_args.post_ids = ids.into_iter().map(ItemId).collect();
        source
    }

    /// Sets the excluded ids.
    pub fn with_excludes(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.query_args.excludes = ids.into_iter().map(ItemId).collect();
        self
    }

    /// Sets the sort specification.
    pub fn with_sort(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sort = SortSpec::new(field, direction);
        self
    }

    /// Sets the stock status filter.
    pub fn with_stock_status(mut self, status: StockStatus) -> Self {
        self.query_args.stock_status = Some(status);
        self
    }

    /// Sets the price range filter.
    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.query_args.price_range = range;
        self
    }
}
