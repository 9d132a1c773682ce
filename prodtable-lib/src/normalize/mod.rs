//! Normalization of raw definition input.
//!
//! [`normalize`] turns the persisted/transient JSON shape into a fully
//! populated [`TableDefinition`]. Omitted fields take their defaults; only
//! required discriminants and semantically illegal combinations are
//! rejected. Normalizing the serialized output of `normalize` yields the
//! same definition.

mod reader;

use std::collections::HashSet;

use serde_json::Value as Json;

use crate::error::ConfigError;
use crate::error::NormalizeError;
use crate::model::*;

use reader::Node;

/// Normalizes raw definition input.
///
/// # Errors
///
/// - [`ShapeError`](crate::error::ShapeError) when `source.kind`, a column
///   `type`, or a combined sub-element `type` is absent (columns) or not one
///   of the closed values.
/// - [`ConfigError`] for nested `combined` columns, duplicate column ids, a
///   zero page limit, or an inverted price range.
///
/// # Example
///
/// ```
/// use prodtable_lib::normalize::normalize;
/// use serde_json::json;
///
/// let definition = normalize(&json!({
///     "title": "Sale",
///     "source": {"kind": "discounted"},
///     "columns": [{"type": "name"}, {"type": "price"}]
/// }))
/// .unwrap();
///
/// assert_eq!(definition.settings.pagination.limit, 10);
/// assert_eq!(definition.columns[1].id, "price-1");
/// ```
pub fn normalize(raw: &Json) -> Result<TableDefinition, NormalizeError> {
    let root = Node::root(raw);
    let defaults = TableDefinition::default();

    let definition = TableDefinition {
        id: root.field("id").u64().map(DefinitionId),
        title: root.field("title").string_or(&defaults.title),
        status: root.field("status").parse_with(Status::parse).unwrap_or_default(),
        revision: root.field("revision").u64().unwrap_or(0),
        source: source(&root.field("source"))?,
        columns: columns(&root.field("columns"))?,
        settings: settings(&root.field("settings"))?,
        style: style(&root.field("style")),
    };

    Ok(definition)
}

/// Normalizes a JSON document given as text.
pub fn normalize_str(raw: &str) -> Result<TableDefinition, NormalizeError> {
    let value: Json = serde_json::from_str(raw)
        .map_err(|e| ConfigError::new("<document>", format!("not valid JSON: {}", e)))?;
    normalize(&value)
}

// =============================================================================
// Source
// =============================================================================

fn source(node: &Node<'_>) -> Result<Source, NormalizeError> {
    let kind_node = node.field("kind");
    let kind = if kind_node.is_present() {
        kind_node.discriminant(SourceKind::parse, SourceKind::VALUES)?
    } else {
        SourceKind::default()
    };

    let args = node.field_any(&["queryArgs", "query_args"]);
    let price = args.field_any(&["priceRange", "price_range"]);
    let price_range = PriceRange::new(price.field("min").decimal(), price.field("max").decimal());
    if let (Some(min), Some(max)) = (price_range.min, price_range.max) {
        if min > max {
            return Err(ConfigError::new(
                price.path(),
                format!("min {} exceeds max {}", min, max),
            )
            .into());
        }
    }

    let query_args = QueryArgs {
        category_ids: ids(&args.field_any(&["categoryIds", "category_ids"]), TermId),
        tag_ids: ids(&args.field_any(&["tagIds", "tag_ids"]), TermId),
        post_ids: ids(&args.field_any(&["postIds", "post_ids"]), ItemId),
        excludes: ids(&args.field("excludes"), ItemId),
        stock_status: args
            .field_any(&["stockStatus", "stock_status"])
            .parse_with(StockStatus::parse),
        price_range,
    };

    let sort_node = node.field("sort");
    let default_sort = SortSpec::default();
    let sort = SortSpec {
        field: sort_node
            .field("field")
            .str()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_string())
            .unwrap_or(default_sort.field),
        direction: sort_node
            .field("direction")
            .parse_with(Direction::parse)
            .unwrap_or(default_sort.direction),
    };

    Ok(Source { kind, query_args, sort })
}

fn ids<T>(node: &Node<'_>, wrap: fn(u64) -> T) -> Vec<T> {
    node.id_list().into_iter().map(wrap).collect()
}

// =============================================================================
// Columns
// =============================================================================

fn columns(node: &Node<'_>) -> Result<Vec<Column>, NormalizeError> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for (position, element) in node.elements().iter().enumerate() {
        let kind = column_kind(element, true)?;
        let id = element
            .field("id")
            .str()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}-{}", kind.type_name(), position));

        if !seen.insert(id.clone()) {
            return Err(ConfigError::duplicate_column(element.field("id").path(), &id).into());
        }

        let heading = element
            .field_any(&["heading", "label"])
            .string_or(kind.default_heading());
        let advanced = advanced(&element.field("advanced"), position);

        columns.push(Column {
            id,
            kind,
            heading,
            advanced,
        });
    }

    Ok(columns)
}

fn advanced(node: &Node<'_>, position: usize) -> Advanced {
    let default_order = i32::try_from(position).unwrap_or(i32::MAX);
    Advanced {
        show_heading: node.field_any(&["showHeading", "show_heading"]).bool_or(true),
        width: width(&node.field("width")),
        visibility: node
            .field_any(&["visibility", "responsive"])
            .parse_with(Visibility::parse)
            .unwrap_or_default(),
        order: node
            .field("order")
            .i64()
            .and_then(|o| i32::try_from(o).ok())
            .unwrap_or(default_order),
    }
}

fn width(node: &Node<'_>) -> Width {
    let unit = node.field("unit").parse_with(WidthUnit::parse).unwrap_or_default();
    let value = node
        .field("value")
        .u64()
        .and_then(|v| u32::try_from(v).ok())
        .filter(|_| unit != WidthUnit::Auto);
    match value {
        Some(_) => Width { value, unit },
        None => Width::default(),
    }
}

/// Reads a column type and its settings.
///
/// `allow_combined` is `false` for sub-elements of a combined column.
fn column_kind(node: &Node<'_>, allow_combined: bool) -> Result<ColumnKind, NormalizeError> {
    let type_node = node.field("type");
    let type_name = type_node.discriminant(known_type, ColumnKind::TYPES)?;
    let settings = node.field("settings");

    let kind = match type_name {
        "image" => ColumnKind::Image(ImageSettings {
            size: settings.field("size").parse_with(ImageSize::parse).unwrap_or_default(),
            link_target: settings
                .field_any(&["linkTarget", "link_target"])
                .parse_with(LinkTarget::parse)
                .unwrap_or_default(),
        }),
        "name" => ColumnKind::Name(NameSettings {
            link_to_product: settings
                .field_any(&["linkToProduct", "link_to_product"])
                .bool_or(true),
        }),
        "price" => ColumnKind::Price,
        "sku" => ColumnKind::Sku,
        "stock" => ColumnKind::Stock,
        "add-to-cart" => ColumnKind::AddToCart,
        "date" => ColumnKind::Date(DateSettings {
            format: settings
                .field("format")
                .str()
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_DATE_FORMAT)
                .to_string(),
        }),
        "summary" => ColumnKind::Summary(SummarySettings {
            word_limit: settings
                .field_any(&["wordLimit", "word_limit"])
                .u64()
                .and_then(|n| usize::try_from(n).ok())
                .filter(|n| *n > 0),
        }),
        "taxonomy" => {
            let defaults = TaxonomySettings::default();
            ColumnKind::Taxonomy(TaxonomySettings {
                taxonomy: settings
                    .field_any(&["taxonomy", "taxonomyKey"])
                    .str()
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .unwrap_or(defaults.taxonomy),
                link_terms: settings.field_any(&["linkTerms", "link_terms"]).bool_or(false),
                separator: settings.field("separator").string().unwrap_or(defaults.separator),
            })
        }
        "custom-field" => ColumnKind::CustomField(CustomFieldSettings {
            meta_key: settings.field_any(&["metaKey", "meta_key"]).string_or(""),
        }),
        "combined" => {
            if !allow_combined {
                return Err(ConfigError::nested_combined(type_node.path()).into());
            }
            let mut elements = Vec::new();
            for element in settings.field("elements").elements() {
                elements.push(column_kind(&element, false)?);
            }
            ColumnKind::Combined(CombinedSettings {
                layout: settings
                    .field("layout")
                    .parse_with(CombinedLayout::parse)
                    .unwrap_or_default(),
                elements,
            })
        }
        other => ColumnKind::Unsupported(other.to_string()),
    };

    Ok(kind)
}

fn known_type(s: &str) -> Option<&'static str> {
    ColumnKind::TYPES.iter().copied().find(|t| *t == s)
}

// =============================================================================
// Settings
// =============================================================================

fn settings(node: &Node<'_>) -> Result<Settings, NormalizeError> {
    let defaults = Settings::default();

    let features_node = node.field("features");
    let bulk = features_node.field_any(&["bulkSelect", "bulk_select"]);
    let features = Features {
        search: features_node.field("search").bool_or(defaults.features.search),
        sorting: features_node.field("sorting").bool_or(defaults.features.sorting),
        pagination: features_node.field("pagination").bool_or(defaults.features.pagination),
        export: features_node.field("export").bool_or(defaults.features.export),
        price_range: features_node
            .field_any(&["priceRange", "price_range", "priceRangeFilter"])
            .bool_or(defaults.features.price_range),
        bulk_select: BulkSelect {
            enabled: bulk.field("enabled").bool_or(false),
            position: bulk
                .field("position")
                .parse_with(BulkSelectPosition::parse)
                .unwrap_or_default(),
            width: width(&bulk.field("width")),
            visibility: bulk
                .field("visibility")
                .parse_with(Visibility::parse)
                .unwrap_or_default(),
        },
    };

    let pagination_node = node.field("pagination");
    let limit_node = pagination_node.field("limit");
    let limit = match limit_node.u64() {
        Some(0) => {
            return Err(ConfigError::new(limit_node.path(), "page limit must be at least 1").into());
        }
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
        None => DEFAULT_PAGE_LIMIT,
    };
    let pagination = PaginationSettings {
        limit,
        position: pagination_node
            .field("position")
            .parse_with(PaginationPosition::parse)
            .unwrap_or_default(),
    };

    let cart_node = node.field("cart");
    let cart = CartSettings {
        enabled: cart_node.field("enabled").bool_or(defaults.cart.enabled),
        method: cart_node.field("method").parse_with(CartMethod::parse).unwrap_or_default(),
        quantity_selector: cart_node
            .field_any(&["quantitySelector", "quantity_selector"])
            .bool_or(defaults.cart.quantity_selector),
        ajax_add: cart_node
            .field_any(&["ajaxAdd", "ajax_add"])
            .bool_or(defaults.cart.ajax_add),
    };

    let filters_node = node.field("filters");
    let filters = FilterSettings {
        enabled: filters_node.field("enabled").bool_or(false),
        taxonomies: filters_node.field("taxonomies").string_list(),
    };

    Ok(Settings {
        features,
        pagination,
        cart,
        filters,
    })
}

// =============================================================================
// Style
// =============================================================================

fn style(node: &Node<'_>) -> Style {
    let header = node.field("header");
    let body = node.field("body");
    let button = node.field("button");
    let layout = node.field("layout");
    let typography = node.field("typography");
    let hover = node.field("hover");
    let responsive = node.field("responsive");

    Style {
        header: HeaderStyle {
            background: token(&header.field("background")),
            text_color: token(&header.field("textColor")),
            font_size: px(&header.field("fontSize")),
            bold: header.field("bold").bool(),
        },
        body: BodyStyle {
            background: token(&body.field("background")),
            alternate_background: token(&body.field("alternateBackground")),
            text_color: token(&body.field("textColor")),
            border_style: body.field("borderStyle").parse_with(BorderStyle::parse),
            border_width: px(&body.field("borderWidth")),
            border_color: token(&body.field("borderColor")),
        },
        button: ButtonStyle {
            background: token(&button.field("background")),
            text_color: token(&button.field("textColor")),
            border_radius: px(&button.field("borderRadius")),
        },
        layout: LayoutStyle {
            max_width: px(&layout.field("maxWidth")),
            cell_padding: px(&layout.field("cellPadding")),
            alignment: layout.field("alignment").parse_with(Alignment::parse),
        },
        typography: Typography {
            font_family: token(&typography.field("fontFamily")),
            font_size: px(&typography.field("fontSize")),
            line_height: typography.field("lineHeight").decimal(),
        },
        hover: HoverStyle {
            enabled: hover.field("enabled").bool(),
            background: token(&hover.field("background")),
            text_color: token(&hover.field("textColor")),
        },
        responsive: ResponsiveStyle {
            mode: match responsive.str() {
                Some(mode) => ResponsiveMode::parse(mode),
                None => responsive.field("mode").parse_with(ResponsiveMode::parse),
            },
        },
    }
}

/// Reads a non-empty string token.
fn token(node: &Node<'_>) -> Option<String> {
    node.str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn px(node: &Node<'_>) -> Option<u32> {
    node.u64().and_then(|v| u32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::error::ShapeError;

    #[test]
    fn test_empty_input_yields_defaults() {
        let definition = normalize(&json!({})).unwrap();
        assert_eq!(definition, TableDefinition::default());
    }

    #[test]
    fn test_defaults_fill_omitted_fields() {
        let definition = normalize(&json!({
            "settings": {"pagination": {}, "cart": {"enabled": true}},
            "columns": [{"type": "image"}]
        }))
        .unwrap();
        assert_eq!(definition.settings.pagination.limit, 10);
        assert_eq!(definition.settings.cart.method, CartMethod::Button);
        assert_eq!(
            definition.columns[0].kind,
            ColumnKind::Image(ImageSettings::default())
        );
        assert_eq!(definition.columns[0].heading, "Image");
        assert_eq!(definition.columns[0].advanced.order, 0);
    }

    #[test]
    fn test_unknown_column_type_is_shape_error() {
        let err = normalize(&json!({
            "columns": [{"type": "name"}, {"type": "name"}, {"type": "rating"}]
        }))
        .unwrap_err();
        match err {
            NormalizeError::Shape(ShapeError { field, found, .. }) => {
                assert_eq!(field, "columns[2].type");
                assert_eq!(found, "rating");
            }
            other => panic!("expected shape error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_type_is_shape_error() {
        let err = normalize(&json!({"columns": [{"heading": "Name"}]})).unwrap_err();
        assert_eq!(err.field(), "columns[0].type");
    }

    #[test]
    fn test_unknown_source_kind_is_shape_error() {
        let err = normalize(&json!({"source": {"kind": "featured"}})).unwrap_err();
        assert!(matches!(err, NormalizeError::Shape(_)));
        assert_eq!(err.field(), "source.kind");
    }

    #[test]
    fn test_absent_source_kind_defaults_to_all() {
        let definition = normalize(&json!({"source": {"queryArgs": {"excludes": [3]}}})).unwrap();
        assert_eq!(definition.source.kind, SourceKind::All);
        assert_eq!(definition.source.query_args.excludes, vec![ItemId(3)]);
    }

    #[test]
    fn test_nested_combined_is_config_error() {
        let err = normalize(&json!({
            "columns": [{
                "type": "combined",
                "settings": {"elements": [{"type": "sku"}, {"type": "combined"}]}
            }]
        }))
        .unwrap_err();
        match err {
            NormalizeError::Config(e) => assert_eq!(e.field, "columns[0].settings.elements[1].type"),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_sub_element_type_is_shape_error() {
        let err = normalize(&json!({
            "columns": [{"type": "combined", "settings": {"elements": [{"type": "rating"}]}}]
        }))
        .unwrap_err();
        assert!(matches!(err, NormalizeError::Shape(_)));
    }

    #[test]
    fn test_duplicate_column_ids_are_config_error() {
        let err = normalize(&json!({
            "columns": [{"id": "a", "type": "sku"}, {"id": "a", "type": "name"}]
        }))
        .unwrap_err();
        assert_eq!(err.field(), "columns[1].id");
    }

    #[test]
    fn test_zero_limit_and_inverted_price_range_are_config_errors() {
        let err = normalize(&json!({"settings": {"pagination": {"limit": 0}}})).unwrap_err();
        assert_eq!(err.field(), "settings.pagination.limit");

        let err = normalize(&json!({
            "source": {"queryArgs": {"priceRange": {"min": 50, "max": 10}}}
        }))
        .unwrap_err();
        assert_eq!(err.field(), "source.queryArgs.priceRange");
    }

    #[test]
    fn test_null_max_is_unbounded() {
        let definition = normalize(&json!({
            "source": {"queryArgs": {"priceRange": {"min": "5", "max": null}}}
        }))
        .unwrap();
        let range = definition.source.query_args.price_range;
        assert_eq!(range.min, Some(rust_decimal::Decimal::new(5, 0)));
        assert_eq!(range.max, None);
    }

    #[test]
    fn test_wrong_typed_optional_fields_take_defaults() {
        let definition = normalize(&json!({
            "title": 42,
            "settings": {"pagination": {"limit": "many"}, "cart": {"method": "teleport"}}
        }))
        .unwrap();
        assert_eq!(definition.title, DEFAULT_TITLE);
        assert_eq!(definition.settings.pagination.limit, 10);
        assert_eq!(definition.settings.cart.method, CartMethod::Button);
    }

    #[test]
    fn test_normalize_is_idempotent_for_rich_definition() {
        let raw = json!({
            "id": 4,
            "title": "Rich",
            "status": "published",
            "source": {
                "kind": "by-category",
                "queryArgs": {"categoryIds": "3,4", "tagIds": [7], "excludes": ["9"],
                              "stockStatus": "instock", "priceRange": {"min": 1.5}},
                "sort": {"field": "price", "direction": "asc"}
            },
            "columns": [
                {"type": "image", "settings": {"size": "medium", "linkTarget": "none"},
                 "advanced": {"width": {"value": 80, "unit": "px"}, "visibility": "desktop"}},
                {"id": "n", "type": "name", "heading": "Product", "advanced": {"order": -1}},
                {"type": "combined", "settings": {"layout": "inline",
                    "elements": [{"type": "sku"}, {"type": "taxonomy", "settings": {"taxonomy": "product_tag"}}]}},
                {"type": "custom-field", "settings": {"metaKey": "weight"}},
                {"type": "summary", "settings": {"wordLimit": 5}},
                {"type": "date", "settings": {"format": "%Y"}}
            ],
            "settings": {
                "features": {"export": true, "bulkSelect": {"enabled": true, "position": "last"}},
                "pagination": {"limit": 25, "position": "both"},
                "cart": {"method": "text-link", "ajaxAdd": false},
                "filters": {"enabled": true, "taxonomies": ["product_cat"]}
            },
            "style": {
                "body": {"borderStyle": "dashed", "borderWidth": 1, "alternateBackground": "#eee"},
                "typography": {"lineHeight": "1.4"},
                "hover": {"enabled": true, "background": "#ffe"},
                "responsive": "stack"
            }
        });
        let once = normalize(&raw).unwrap();
        let twice = normalize(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.columns[1].advanced.order, -1);
        assert_eq!(once.style.responsive.mode, Some(ResponsiveMode::Stack));
    }

    fn arb_column() -> impl Strategy<Value = Json> {
        (
            proptest::sample::select(vec![
                "image", "name", "price", "sku", "stock", "add-to-cart", "date", "summary",
                "taxonomy", "custom-field",
            ]),
            proptest::option::of(0i64..20),
            proptest::option::of("[a-z]{1,8}"),
            proptest::option::of(proptest::sample::select(vec!["all", "desktop", "mobile-only", "bogus"])),
        )
            .prop_map(|(kind, order, heading, visibility)| {
                json!({
                    "type": kind,
                    "heading": heading,
                    "advanced": {"order": order, "visibility": visibility, "width": {"value": order, "unit": "px"}},
                    "settings": {"wordLimit": order, "metaKey": heading, "size": visibility}
                })
            })
    }

    fn arb_definition() -> impl Strategy<Value = Json> {
        (
            proptest::collection::vec(arb_column(), 0..6),
            proptest::sample::select(vec!["all", "discounted", "by-category", "explicit-list"]),
            proptest::collection::vec(0u64..100, 0..5),
            1u64..50,
            proptest::option::of(0u32..500),
            any::<bool>(),
        )
            .prop_map(|(columns, kind, ids, limit, min, export)| {
                json!({
                    "columns": columns,
                    "source": {"kind": kind, "queryArgs": {"postIds": ids, "priceRange": {"min": min}}},
                    "settings": {"features": {"export": export}, "pagination": {"limit": limit}}
                })
            })
    }

    proptest! {
        #[test]
        fn test_normalize_is_idempotent(raw in arb_definition()) {
            let once = normalize(&raw).unwrap();
            let twice = normalize(&serde_json::to_value(&once).unwrap()).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
