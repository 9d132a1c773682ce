//! Column definitions
//!
//! A column's type and its type-specific settings travel together in
//! [`ColumnKind`]; the persisted shape keeps them as separate `type` and
//! `settings` keys, see the custom [`Serialize`] impls below.

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;

/// Width unit of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WidthUnit {
    /// Let the table layout decide.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// Pixels.
    #[serde(rename = "px")]
    Px,
    /// Percentage of the table width.
    #[serde(rename = "%")]
    Percent,
}

impl WidthUnit {
    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Self::Auto),
            "px" => Some(Self::Px),
            "%" | "percent" => Some(Self::Percent),
            _ => None,
        }
    }
}

/// A width value with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Width {
    /// Numeric value; ignored for `auto`.
    pub value: Option<u32>,
    /// Unit.
    pub unit: WidthUnit,
}

impl Width {
    /// A pixel width.
    pub fn px(value: u32) -> Self {
        Self {
            value: Some(value),
            unit: WidthUnit::Px,
        }
    }

    /// A percentage width.
    pub fn percent(value: u32) -> Self {
        Self {
            value: Some(value),
            unit: WidthUnit::Percent,
        }
    }

    /// Returns the CSS length, or `None` for automatic widths.
    pub fn to_css(&self) -> Option<String> {
        match (self.unit, self.value) {
            (WidthUnit::Px, Some(v)) => Some(format!("{}px", v)),
            (WidthUnit::Percent, Some(v)) => Some(format!("{}%", v)),
            _ => None,
        }
    }
}

/// Responsive visibility of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// Visible on every device.
    #[default]
    All,
    /// Desktop only.
    Desktop,
    /// Tablet and desktop.
    TabletUp,
    /// Mobile only.
    MobileOnly,
}

impl Visibility {
    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "desktop" => Some(Self::Desktop),
            "tablet-up" => Some(Self::TabletUp),
            "mobile-only" => Some(Self::MobileOnly),
            _ => None,
        }
    }

    /// Classes hiding the column on the devices it is not shown on.
    pub fn classes(&self) -> &'static [&'static str] {
        match self {
            Self::All => &[],
            Self::Desktop => &["pt-hide-tablet", "pt-hide-mobile"],
            Self::TabletUp => &["pt-hide-mobile"],
            Self::MobileOnly => &["pt-hide-desktop", "pt-hide-tablet"],
        }
    }
}

/// Presentation options shared by every column type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advanced {
    /// Whether the heading is shown.
    pub show_heading: bool,
    /// Column width.
    pub width: Width,
    /// Responsive visibility.
    pub visibility: Visibility,
    /// Display order; ties keep list position.
    pub order: i32,
}

impl Default for Advanced {
    fn default() -> Self {
        Self {
            show_heading: true,
            width: Width::default(),
            visibility: Visibility::default(),
            order: 0,
        }
    }
}

/// Image size variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    /// Thumbnail.
    #[default]
    Thumbnail,
    /// Medium.
    Medium,
    /// Large.
    Large,
    /// Original upload.
    Full,
}

impl ImageSize {
    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "thumbnail" => Some(Self::Thumbnail),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    /// Returns the size key used by [`ImageRef`](super::ImageRef).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumbnail => "thumbnail",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Full => "full",
        }
    }
}

/// Where an image links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkTarget {
    /// The item detail page.
    #[default]
    Product,
    /// No link.
    None,
}

impl LinkTarget {
    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "product" => Some(Self::Product),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Settings of an `image` column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSettings {
    /// Size variant.
    pub size: ImageSize,
    /// Link target.
    pub link_target: LinkTarget,
}

/// Settings of a `name` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameSettings {
    /// Link the title to the item detail page.
    pub link_to_product: bool,
}

impl Default for NameSettings {
    fn default() -> Self {
        Self { link_to_product: true }
    }
}

/// Default strftime format for date columns.
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

/// Settings of a `date` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateSettings {
    /// chrono strftime format.
    pub format: String,
}

impl Default for DateSettings {
    fn default() -> Self {
        Self {
            format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Settings of a `summary` column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySettings {
    /// Truncate to this many words.
    pub word_limit: Option<usize>,
}

/// Settings of a `taxonomy` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomySettings {
    /// Taxonomy key, e.g. `product_cat`.
    pub taxonomy: String,
    /// Link each term to its archive.
    pub link_terms: bool,
    /// Separator between terms.
    pub separator: String,
}

impl Default for TaxonomySettings {
    fn default() -> Self {
        Self {
            taxonomy: super::CATEGORY_TAXONOMY.to_string(),
            link_terms: false,
            separator: ", ".to_string(),
        }
    }
}

/// Settings of a `custom-field` column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldSettings {
    /// Meta key to look up.
    pub meta_key: String,
}

/// Layout of a `combined` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinedLayout {
    /// One element per line.
    #[default]
    Stacked,
    /// Elements side by side.
    Inline,
}

impl CombinedLayout {
    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stacked" => Some(Self::Stacked),
            "inline" => Some(Self::Inline),
            _ => None,
        }
    }
}

/// Settings of a `combined` column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CombinedSettings {
    /// Layout of the composed elements.
    pub layout: CombinedLayout,
    /// Sub-elements; never `combined` themselves once normalized.
    pub elements: Vec<ColumnKind>,
}

/// Column type together with its type-specific settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// Item image.
    Image(ImageSettings),
    /// Item title.
    Name(NameSettings),
    /// Regular and sale price.
    Price,
    /// Stock keeping unit.
    Sku,
    /// Stock status.
    Stock,
    /// Add-to-cart action.
    AddToCart,
    /// Publication date.
    Date(DateSettings),
    /// Short description.
    Summary(SummarySettings),
    /// Taxonomy terms.
    Taxonomy(TaxonomySettings),
    /// Meta value.
    CustomField(CustomFieldSettings),
    /// Several elements in one cell.
    Combined(CombinedSettings),
    /// A type this version does not know. Normalization rejects it; a
    /// definition built in code may still carry it and renders it empty.
    Unsupported(String),
}

impl ColumnKind {
    /// Accepted type names.
    pub const TYPES: &'static [&'static str] = &[
        "image",
        "name",
        "price",
        "sku",
        "stock",
        "add-to-cart",
        "date",
        "summary",
        "taxonomy",
        "custom-field",
        "combined",
    ];

    /// Returns the persisted type name.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Image(_) => "image",
            Self::Name(_) => "name",
            Self::Price => "price",
            Self::Sku => "sku",
            Self::Stock => "stock",
            Self::AddToCart => "add-to-cart",
            Self::Date(_) => "date",
            Self::Summary(_) => "summary",
            Self::Taxonomy(_) => "taxonomy",
            Self::CustomField(_) => "custom-field",
            Self::Combined(_) => "combined",
            Self::Unsupported(name) => name,
        }
    }

    /// Returns the default heading for this type.
    pub fn default_heading(&self) -> &'static str {
        match self {
            Self::Image(_) => "Image",
            Self::Name(_) => "Name",
            Self::Price => "Price",
            Self::Sku => "SKU",
            Self::Stock => "Stock",
            Self::AddToCart => "Buy",
            Self::Date(_) => "Date",
            Self::Summary(_) => "Summary",
            Self::Taxonomy(_) => "Categories",
            Self::CustomField(_) => "",
            Self::Combined(_) => "Details",
            Self::Unsupported(_) => "",
        }
    }

    /// Returns `true` if a runtime sort override may target this type.
    pub fn is_sortable(&self) -> bool {
        !matches!(
            self,
            Self::Image(_) | Self::AddToCart | Self::Combined(_) | Self::Unsupported(_)
        )
    }

    /// Returns `true` if this is an action rather than a value column.
    pub fn is_action(&self) -> bool {
        matches!(self, Self::AddToCart)
    }

    /// Writes the `settings` key of the persisted shape.
    fn serialize_settings<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        match self {
            Self::Image(s) => map.serialize_entry("settings", s),
            Self::Name(s) => map.serialize_entry("settings", s),
            Self::Date(s) => map.serialize_entry("settings", s),
            Self::Summary(s) => map.serialize_entry("settings", s),
            Self::Taxonomy(s) => map.serialize_entry("settings", s),
            Self::CustomField(s) => map.serialize_entry("settings", s),
            Self::Combined(s) => map.serialize_entry("settings", &CombinedRepr(s)),
            Self::Price | Self::Sku | Self::Stock | Self::AddToCart | Self::Unsupported(_) => Ok(()),
        }
    }
}

/// Serializes a sub-element of a combined column as `{type, settings}`.
struct ElementRepr<'a>(&'a ColumnKind);

impl Serialize for ElementRepr<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.0.type_name())?;
        self.0.serialize_settings(&mut map)?;
        map.end()
    }
}

struct CombinedRepr<'a>(&'a CombinedSettings);

impl Serialize for CombinedRepr<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let elements: Vec<ElementRepr<'_>> = self.0.elements.iter().map(ElementRepr).collect();
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("layout", &self.0.layout)?;
        map.serialize_entry("elements", &elements)?;
        map.end()
    }
}

/// One renderable slot of a table.
///
/// # Example
///
/// ```
/// use prodtable_lib::model::{Column, ColumnKind};
///
/// let sku = Column::new("sku", ColumnKind::Sku).with_heading("Code").with_order(3);
/// assert_eq!(sku.kind.type_name(), "sku");
/// assert_eq!(sku.advanced.order, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Identifier, unique within the definition.
    pub id: String,
    /// Type and type-specific settings.
    pub kind: ColumnKind,
    /// Heading text.
    pub heading: String,
    /// Shared presentation options.
    pub advanced: Advanced,
}

impl Column {
    /// Creates a column with the type's default heading.
    pub fn new(id: impl Into<String>, kind: ColumnKind) -> Self {
        let heading = kind.default_heading().to_string();
        Self {
            id: id.into(),
            kind,
            heading,
            advanced: Advanced::default(),
        }
    }

    /// Sets the heading.
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    /// Sets the display order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.advanced.order = order;
        self
    }

    /// Sets the responsive visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.advanced.visibility = visibility;
        self
    }

    /// Sets the width.
    pub fn with_width(mut self, width: Width) -> Self {
        self.advanced.width = width;
        self
    }

    /// Hides the heading.
    pub fn without_heading(mut self) -> Self {
        self.advanced.show_heading = false;
        self
    }
}

impl Serialize for Column {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("type", self.kind.type_name())?;
        map.serialize_entry("heading", &self.heading)?;
        map.serialize_entry("advanced", &self.advanced)?;
        self.kind.serialize_settings(&mut map)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_serializes_type_and_settings_separately() {
        let column = Column::new(
            "cats",
            ColumnKind::Taxonomy(TaxonomySettings {
                taxonomy: "product_tag".to_string(),
                ..Default::default()
            }),
        );
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["type"], "taxonomy");
        assert_eq!(json["settings"]["taxonomy"], "product_tag");
        assert_eq!(json["advanced"]["showHeading"], true);
    }

    #[test]
    fn test_combined_elements_serialize_with_types() {
        let column = Column::new(
            "details",
            ColumnKind::Combined(CombinedSettings {
                layout: CombinedLayout::Inline,
                elements: vec![ColumnKind::Sku, ColumnKind::Name(NameSettings::default())],
            }),
        );
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["settings"]["layout"], "inline");
        assert_eq!(json["settings"]["elements"][0]["type"], "sku");
        assert_eq!(json["settings"]["elements"][1]["settings"]["linkToProduct"], true);
    }

    #[test]
    fn test_width_css() {
        assert_eq!(Width::px(120).to_css().as_deref(), Some("120px"));
        assert_eq!(Width::percent(20).to_css().as_deref(), Some("20%"));
        assert_eq!(Width::default().to_css(), None);
    }
}
