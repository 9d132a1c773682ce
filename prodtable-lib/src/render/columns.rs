//! One renderer per column type

use std::fmt::Write;

use chrono::format::Item;
use chrono::format::StrftimeItems;

use super::Cell;
use super::CellContent;
use crate::model::CombinedSettings;
use crate::model::CustomFieldSettings;
use crate::model::DateSettings;
use crate::model::ImageSettings;
use crate::model::LinkTarget;
use crate::model::NameSettings;
use crate::model::StockStatus;
use crate::model::SummarySettings;
use crate::model::TaxonomySettings;
use crate::model::DEFAULT_DATE_FORMAT;
use crate::pipeline::CartAction;

impl Cell<'_> {
    pub(super) fn image(&mut self, settings: &ImageSettings) -> CellContent {
        let Some(image) = &self.item.image else {
            return self.missing("image");
        };
        let alt = if image.alt.is_empty() {
            self.item.title.clone()
        } else {
            image.alt.clone()
        };
        let href = match settings.link_target {
            LinkTarget::Product => self.item.permalink.clone(),
            LinkTarget::None => None,
        };
        CellContent::Image {
            src: image.url_for(settings.size.as_str()).to_string(),
            alt,
            href,
        }
    }

    pub(super) fn name(&mut self, settings: &NameSettings) -> CellContent {
        match (&self.item.permalink, settings.link_to_product) {
            (Some(href), true) => CellContent::link(&self.item.title, href),
            _ => CellContent::text(&self.item.title),
        }
    }

    pub(super) fn price(&mut self) -> CellContent {
        let currency = &self.context.currency;
        match (self.item.regular_price, self.item.sale_price) {
            (Some(regular), sale) => CellContent::Price {
                regular: currency.format(regular),
                sale: sale.map(|s| currency.format(s)),
            },
            (None, Some(sale)) => CellContent::Price {
                regular: currency.format(sale),
                sale: None,
            },
            (None, None) => self.missing("price"),
        }
    }

    pub(super) fn sku(&mut self) -> CellContent {
        match self.item.sku.as_deref().map(str::trim) {
            Some(sku) if !sku.is_empty() => CellContent::text(sku),
            _ => self.missing("sku"),
        }
    }

    pub(super) fn stock(&mut self) -> CellContent {
        let Some(stock) = self.item.stock else {
            return self.missing("stock information");
        };
        let text = match (stock.status, stock.quantity) {
            (StockStatus::InStock, Some(quantity)) => format!("{} in stock", quantity),
            (StockStatus::InStock, None) => "In stock".to_string(),
            (StockStatus::OutOfStock, _) => "Out of stock".to_string(),
            (StockStatus::OnBackorder, _) => "On backorder".to_string(),
        };
        CellContent::text(text)
    }

    pub(super) fn add_to_cart(&mut self) -> CellContent {
        if !self.context.cart.enabled {
            return CellContent::Empty;
        }
        CellContent::Action(CartAction::for_item(self.item, &self.context.cart))
    }

    pub(super) fn date(&mut self, settings: &DateSettings) -> CellContent {
        let Some(date) = self.item.date else {
            return self.missing("date");
        };

        let mut format = settings.format.as_str();
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            self.fallback(format!("invalid date format '{}'", format));
            format = DEFAULT_DATE_FORMAT;
        }

        let mut text = String::new();
        match write!(text, "{}", date.format_with_items(StrftimeItems::new(format))) {
            Ok(()) => CellContent::text(text),
            Err(_) => self.missing("formattable date"),
        }
    }

    pub(super) fn summary(&mut self, settings: &SummarySettings) -> CellContent {
        let summary = self.item.summary.as_deref().map(str::trim).unwrap_or_default();
        if summary.is_empty() {
            return self.missing("summary");
        }
        match settings.word_limit {
            Some(limit) => CellContent::text(truncate_words(summary, limit)),
            None => CellContent::text(summary),
        }
    }

    pub(super) fn taxonomy(&mut self, settings: &TaxonomySettings) -> CellContent {
        let terms = self.item.terms_for(&settings.taxonomy);
        if terms.is_empty() {
            return CellContent::Empty;
        }
        let items = terms
            .iter()
            .map(|term| match (&term.url, settings.link_terms) {
                (Some(url), true) => CellContent::link(&term.name, url),
                _ => CellContent::text(&term.name),
            })
            .collect();
        CellContent::List {
            items,
            separator: settings.separator.clone(),
        }
    }

    pub(super) fn custom_field(&mut self, settings: &CustomFieldSettings) -> CellContent {
        if settings.meta_key.is_empty() {
            return CellContent::Empty;
        }
        match self.item.meta(&settings.meta_key) {
            Some(value) if !value.is_blank() => CellContent::text(value.to_display_string()),
            _ => self.missing(&format!("meta value '{}'", settings.meta_key)),
        }
    }

    pub(super) fn combined(&mut self, settings: &CombinedSettings) -> CellContent {
        let parts = settings
            .elements
            .iter()
            .map(|element| self.render_kind(element, true))
            .collect();
        CellContent::Composite {
            layout: settings.layout,
            parts,
        }
    }
}

/// Keeps the first `limit` words, appending an ellipsis when cut.
fn truncate_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return words.join(" ");
    }
    format!("{}…", words[..limit].join(" "))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use crate::catalog::CurrencyFormat;
    use crate::error::DiagnosticKind;
    use crate::model::*;
    use crate::pipeline::Eligibility;
    use crate::render::render;
    use crate::render::CellContent;
    use crate::render::RenderContext;
    use crate::render::RenderedCell;

    fn context() -> RenderContext {
        RenderContext::new(CurrencyFormat::default(), CartSettings::default())
    }

    fn item() -> CatalogItem {
        CatalogItem::new(ItemId(9), "Blue Mug")
            .with_permalink("/p/blue-mug")
            .with_prices(Money::from_cents(2500), Some(Money::from_cents(1800)))
            .with_image(ImageRef::new("/img/mug.jpg").with_size("thumbnail", "/img/mug-150.jpg"))
            .with_date(Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap())
            .with_summary("A sturdy blue mug for hot drinks")
            .with_term(CATEGORY_TAXONOMY, Term::new(1, "Kitchen"))
            .with_term(
                CATEGORY_TAXONOMY,
                Term {
                    url: Some("/c/gifts".to_string()),
                    ..Term::new(2, "Gifts")
                },
            )
            .with_stock(Stock::with_quantity(4))
            .with_meta("weight", 350i64)
    }

    fn cell(kind: ColumnKind, item: &CatalogItem) -> RenderedCell {
        render(&Column::new("col", kind), item, &context())
    }

    #[test]
    fn test_price_with_sale() {
        let rendered = cell(ColumnKind::Price, &item());
        assert_eq!(
            rendered.content,
            CellContent::Price {
                regular: "$25.00".to_string(),
                sale: Some("$18.00".to_string()),
            }
        );
    }

    #[test]
    fn test_price_without_sale_shows_regular_only() {
        let item = item().with_prices(Money::from_cents(2500), None);
        let rendered = cell(ColumnKind::Price, &item);
        assert_eq!(
            rendered.content,
            CellContent::Price {
                regular: "$25.00".to_string(),
                sale: None,
            }
        );
    }

    #[test]
    fn test_missing_price_is_empty_with_diagnostic() {
        let rendered = cell(ColumnKind::Price, &CatalogItem::new(ItemId(1), "Free"));
        assert_eq!(rendered.content, CellContent::Empty);
        assert_eq!(rendered.diagnostics.len(), 1);
        assert_eq!(rendered.diagnostics[0].item, Some(ItemId(1)));
    }

    #[test]
    fn test_image_size_and_link() {
        let rendered = cell(ColumnKind::Image(ImageSettings::default()), &item());
        assert_eq!(
            rendered.content,
            CellContent::Image {
                src: "/img/mug-150.jpg".to_string(),
                alt: "Blue Mug".to_string(),
                href: Some("/p/blue-mug".to_string()),
            }
        );

        let large = ImageSettings {
            size: ImageSize::Large,
            link_target: LinkTarget::None,
        };
        match cell(ColumnKind::Image(large), &item()).content {
            CellContent::Image { src, href, .. } => {
                assert_eq!(src, "/img/mug.jpg");
                assert_eq!(href, None);
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_name_link_toggle() {
        assert_eq!(
            cell(ColumnKind::Name(NameSettings::default()), &item()).content,
            CellContent::link("Blue Mug", "/p/blue-mug")
        );
        let plain = NameSettings { link_to_product: false };
        assert_eq!(cell(ColumnKind::Name(plain), &item()).content, CellContent::text("Blue Mug"));
    }

    #[test]
    fn test_stock_texts() {
        assert_eq!(cell(ColumnKind::Stock, &item()).content, CellContent::text("4 in stock"));
        let item = item().with_stock(Stock::new(StockStatus::OnBackorder));
        assert_eq!(cell(ColumnKind::Stock, &item).content, CellContent::text("On backorder"));
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(
            cell(ColumnKind::Date(DateSettings::default()), &item()).content,
            CellContent::text("March 5, 2024")
        );
        let broken = DateSettings {
            format: "%Q".to_string(),
        };
        let rendered = cell(ColumnKind::Date(broken), &item());
        assert_eq!(rendered.content, CellContent::text("March 5, 2024"));
        assert_eq!(rendered.diagnostics.len(), 1);
    }

    #[test]
    fn test_summary_word_limit() {
        let settings = SummarySettings { word_limit: Some(3) };
        assert_eq!(
            cell(ColumnKind::Summary(settings), &item()).content,
            CellContent::text("A sturdy blue…")
        );
    }

    #[test]
    fn test_taxonomy_terms() {
        let settings = TaxonomySettings {
            link_terms: true,
            ..Default::default()
        };
        let rendered = cell(ColumnKind::Taxonomy(settings), &item());
        assert_eq!(rendered.content.to_plain_text(), "Kitchen, Gifts");
        match rendered.content {
            CellContent::List { items, .. } => assert_eq!(items[1], CellContent::link("Gifts", "/c/gifts")),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_field() {
        let weight = CustomFieldSettings {
            meta_key: "weight".to_string(),
        };
        assert_eq!(cell(ColumnKind::CustomField(weight), &item()).content, CellContent::text("350"));

        let color = CustomFieldSettings {
            meta_key: "color".to_string(),
        };
        let rendered = cell(ColumnKind::CustomField(color), &item());
        assert!(rendered.content.is_empty());
        assert_eq!(rendered.diagnostics.len(), 1);
    }

    #[test]
    fn test_add_to_cart_action() {
        let sold_out = item().with_stock(Stock::new(StockStatus::OutOfStock));
        match cell(ColumnKind::AddToCart, &sold_out).content {
            CellContent::Action(action) => assert_eq!(action.eligibility, Eligibility::OutOfStock),
            other => panic!("expected action, got {:?}", other),
        }
    }

    #[test]
    fn test_combined_renders_parts_and_rejects_nesting() {
        let combined = ColumnKind::Combined(CombinedSettings {
            layout: CombinedLayout::Inline,
            elements: vec![
                ColumnKind::Sku,
                ColumnKind::Stock,
                ColumnKind::Combined(CombinedSettings::default()),
            ],
        });
        let rendered = cell(combined, &item());
        match &rendered.content {
            CellContent::Composite { parts, .. } => {
                assert_eq!(parts.len(), 3);
                assert!(parts[2].is_empty());
            }
            other => panic!("expected composite, got {:?}", other),
        }
        // missing sku + nested combined
        assert_eq!(rendered.diagnostics.len(), 2);
    }

    #[test]
    fn test_unsupported_type_is_empty_with_one_diagnostic() {
        let rendered = cell(ColumnKind::Unsupported("rating".to_string()), &item());
        assert_eq!(rendered.content, CellContent::Empty);
        assert_eq!(rendered.diagnostics.len(), 1);
        assert_eq!(rendered.diagnostics[0].kind, DiagnosticKind::RenderFallback);
        assert_eq!(rendered.diagnostics[0].column.as_deref(), Some("col"));
    }
}
