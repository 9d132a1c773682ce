//! Feature toggles and behaviour settings

use serde::Serialize;

use super::Visibility;
use super::Width;

/// Where the bulk-select checkbox column sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkSelectPosition {
    /// Before the first column.
    #[default]
    First,
    /// After the last column.
    Last,
}

impl BulkSelectPosition {
    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first" => Some(Self::First),
            "last" => Some(Self::Last),
            _ => None,
        }
    }
}

/// Bulk-select feature options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BulkSelect {
    /// Whether rows carry a selection affordance.
    pub enabled: bool,
    /// Position of the selection column.
    pub position: BulkSelectPosition,
    /// Width of the selection column.
    pub width: Width,
    /// Responsive visibility of the selection column.
    pub visibility: Visibility,
}

/// Feature toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    /// Free-text search over name and SKU.
    pub search: bool,
    /// Client-visible sort overrides.
    pub sorting: bool,
    /// Pagination; when off, every row is on one page.
    pub pagination: bool,
    /// CSV export.
    pub export: bool,
    /// Runtime price-range narrowing.
    pub price_range: bool,
    /// Bulk selection.
    pub bulk_select: BulkSelect,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            search: true,
            sorting: true,
            pagination: true,
            export: false,
            price_range: false,
            bulk_select: BulkSelect::default(),
        }
    }
}

/// Where pagination controls are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationPosition {
    /// Above the table.
    Top,
    /// Below the table.
    #[default]
    Bottom,
    /// Above and below.
    Both,
}

impl PaginationPosition {
    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    /// Returns `true` if controls are shown above the table.
    pub fn shows_top(&self) -> bool {
        matches!(self, Self::Top | Self::Both)
    }

    /// Returns `true` if controls are shown below the table.
    pub fn shows_bottom(&self) -> bool {
        matches!(self, Self::Bottom | Self::Both)
    }
}

/// Default page size.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Pagination options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationSettings {
    /// Rows per page, at least 1.
    pub limit: usize,
    /// Control position.
    pub position: PaginationPosition,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            position: PaginationPosition::default(),
        }
    }
}

/// How a row offers its add-to-cart action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CartMethod {
    /// A button per row.
    #[default]
    Button,
    /// A checkbox per row, added together.
    Checkbox,
    /// A text link per row.
    TextLink,
}

impl CartMethod {
    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "button" => Some(Self::Button),
            "checkbox" => Some(Self::Checkbox),
            "text-link" => Some(Self::TextLink),
            _ => None,
        }
    }
}

/// Cart behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSettings {
    /// Whether rows offer cart actions at all.
    pub enabled: bool,
    /// Interaction method.
    pub method: CartMethod,
    /// Show a quantity selector next to the action.
    pub quantity_selector: bool,
    /// The host adds asynchronously instead of navigating.
    pub ajax_add: bool,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            method: CartMethod::default(),
            quantity_selector: false,
            ajax_add: true,
        }
    }
}

/// Taxonomy filter options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterSettings {
    /// Whether filter facets are offered.
    pub enabled: bool,
    /// Taxonomy keys offered as filters.
    pub taxonomies: Vec<String>,
}

impl FilterSettings {
    /// Returns `true` if the taxonomy is an active filter.
    pub fn is_active(&self, taxonomy: &str) -> bool {
        self.enabled && self.taxonomies.iter().any(|t| t == taxonomy)
    }
}

/// Feature toggles and behaviour of a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Settings {
    /// Feature toggles.
    pub features: Features,
    /// Pagination options.
    pub pagination: PaginationSettings,
    /// Cart behaviour.
    pub cart: CartSettings,
    /// Taxonomy filters.
    pub filters: FilterSettings,
}
