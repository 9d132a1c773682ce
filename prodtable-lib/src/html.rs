//! HTML writer for rendered tables
//!
//! Every text and attribute value is escaped. Full renders produce a
//! complete table with its stylesheet; refresh renders produce only the
//! `<tr>` rows for the host to swap into an existing table body.

use crate::model::BulkSelectPosition;
use crate::model::CartMethod;
use crate::model::CombinedLayout;
use crate::orchestrator::RenderedOutput;
use crate::orchestrator::Row;
use crate::pipeline::CartAction;
use crate::pipeline::Eligibility;
use crate::pipeline::PaginationMeta;
use crate::render::CellContent;

/// Writes rendered output as HTML under the element id `id`.
///
pub fn render(output: &RenderedOutput, id: &str) -> String {
    let mut html = String::new();

    if !output.mode.is_full() {
        for row in &output.rows {
            write_row(&mut html, row, output.selection);
        }
        return html;
    }

    if let Some(presentation) = output.presentation.as_ref().filter(|p| !p.rules.is_empty()) {
        html.push_str("<style>\n");
        html.push_str(&presentation.to_css(&format!("#{}", id)));
        html.push_str("</style>\n");
    }

    let pagination = &output.pagination;
    if pagination.position.shows_top() {
        write_pagination(&mut html, pagination, "top");
    }

    let mut classes = vec!["pt-table".to_string()];
    if let Some(presentation) = &output.presentation {
        classes.extend(presentation.classes.iter().cloned());
    }
    html.push_str(&format!(
        "<table id=\"{}\" class=\"{}\">\n",
        escape(id),
        escape(&classes.join(" "))
    ));

    if !output.headers.is_empty() {
        html.push_str("<thead>\n<tr>");
        if output.selection == Some(BulkSelectPosition::First) {
            html.push_str("<th class=\"pt-select\"></th>");
        }
        for header in &output.headers {
            html.push_str("<th");
            write_classes(&mut html, &header.classes);
            if let Some(width) = &header.width {
                html.push_str(&format!(" style=\"width: {}\"", escape(width)));
            }
            if header.sortable {
                html.push_str(&format!(" data-sort=\"{}\"", escape(&header.column)));
            }
            html.push('>');
            html.push_str(&escape(&header.text));
            html.push_str("</th>");
        }
        if output.selection == Some(BulkSelectPosition::Last) {
            html.push_str("<th class=\"pt-select\"></th>");
        }
        html.push_str("</tr>\n</thead>\n");
    }

    html.push_str("<tbody>\n");
    for row in &output.rows {
        write_row(&mut html, row, output.selection);
    }
    html.push_str("</tbody>\n</table>\n");

    if pagination.position.shows_bottom() {
        write_pagination(&mut html, pagination, "bottom");
    }
    html
}

/// Escapes text for use in element content and attribute values.
///
/// # Example
///
/// ```
/// use prodtable_lib::html::escape;
///
/// assert_eq!(escape("<b>\"Mugs\" & more</b>"), "&lt;b&gt;&quot;Mugs&quot; &amp; more&lt;/b&gt;");
/// ```
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn write_classes(html: &mut String, classes: &[String]) {
    if !classes.is_empty() {
        html.push_str(&format!(" class=\"{}\"", escape(&classes.join(" "))));
    }
}

fn write_pagination(html: &mut String, pagination: &PaginationMeta, edge: &str) {
    if pagination.total_pages <= 1 {
        return;
    }
    html.push_str(&format!(
        "<nav class=\"pt-pagination pt-pagination-{}\" data-page=\"{}\" data-pages=\"{}\">Page {} of {}</nav>\n",
        edge, pagination.page, pagination.total_pages, pagination.page, pagination.total_pages
    ));
}

fn write_row(html: &mut String, row: &Row, selection: Option<BulkSelectPosition>) {
    html.push_str(&format!("<tr data-item=\"{}\">", row.item));
    if selection == Some(BulkSelectPosition::First) {
        write_select(html, row);
    }
    for cell in &row.cells {
        html.push_str("<td");
        write_classes(html, &cell.classes);
        html.push('>');
        write_content(html, &cell.content);
        html.push_str("</td>");
    }
    if selection == Some(BulkSelectPosition::Last) {
        write_select(html, row);
    }
    html.push_str("</tr>\n");
}

fn write_select(html: &mut String, row: &Row) {
    if row.decoration.selectable {
        html.push_str(&format!(
            "<td class=\"pt-select\"><input type=\"checkbox\" name=\"pt-select[]\" value=\"{}\"></td>",
            row.item
        ));
    } else {
        html.push_str("<td class=\"pt-select\"></td>");
    }
}

fn write_content(html: &mut String, content: &CellContent) {
    match content {
        CellContent::Empty => {}
        CellContent::Text { text } => html.push_str(&escape(text)),
        CellContent::Link { text, href } => {
            html.push_str(&format!("<a href=\"{}\">{}</a>", escape(href), escape(text)));
        }
        CellContent::Image { src, alt, href } => {
            let image = format!("<img src=\"{}\" alt=\"{}\">", escape(src), escape(alt));
            match href {
                Some(href) => html.push_str(&format!("<a href=\"{}\">{}</a>", escape(href), image)),
                None => html.push_str(&image),
            }
        }
        CellContent::Price { regular, sale: Some(sale) } => {
            html.push_str(&format!("<del>{}</del> <ins>{}</ins>", escape(regular), escape(sale)));
        }
        CellContent::Price { regular, sale: None } => html.push_str(&escape(regular)),
        CellContent::List { items, separator } => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    html.push_str(&escape(separator));
                }
                write_content(html, item);
            }
        }
        CellContent::Composite { layout, parts } => {
            for part in parts.iter().filter(|p| !p.is_empty()) {
                match layout {
                    CombinedLayout::Stacked => {
                        html.push_str("<div class=\"pt-part\">");
                        write_content(html, part);
                        html.push_str("</div>");
                    }
                    CombinedLayout::Inline => {
                        html.push_str("<span class=\"pt-part\">");
                        write_content(html, part);
                        html.push_str("</span> ");
                    }
                }
            }
        }
        CellContent::Action(action) => write_action(html, action),
    }
}

fn write_action(html: &mut String, action: &CartAction) {
    match action.eligibility {
        Eligibility::Eligible => {}
        Eligibility::NotPurchasable => {
            html.push_str("<span class=\"pt-unavailable\">Unavailable</span>");
            return;
        }
        Eligibility::OutOfStock => {
            html.push_str("<span class=\"pt-unavailable\">Out of stock</span>");
            return;
        }
    }

    if action.quantity_selector {
        html.push_str(&format!(
            "<input type=\"number\" class=\"pt-quantity\" name=\"quantity[{}]\" min=\"1\" value=\"1\">",
            action.item_id
        ));
    }
    let ajax = if action.ajax { " data-ajax=\"true\"" } else { "" };
    match action.method {
        CartMethod::Button => html.push_str(&format!(
            "<button class=\"pt-cart-button\" data-item=\"{}\"{}>Add to cart</button>",
            action.item_id, ajax
        )),
        CartMethod::Checkbox => html.push_str(&format!(
            "<input type=\"checkbox\" class=\"pt-cart-checkbox\" name=\"add-to-cart[]\" value=\"{}\"{}>",
            action.item_id, ajax
        )),
        CartMethod::TextLink => html.push_str(&format!(
            "<a class=\"pt-cart-link\" href=\"?add-to-cart={}\" data-item=\"{}\"{}>Add to cart</a>",
            action.item_id, action.item_id, ajax
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::model::CatalogItem;
    use crate::model::Column;
    use crate::model::ColumnKind;
    use crate::model::ItemId;
    use crate::model::NameSettings;
    use crate::model::TableDefinition;
    use crate::model::Visibility;
    use crate::orchestrator::Mode;
    use crate::orchestrator::Orchestrator;
    use crate::pipeline::RequestParams;

    async fn render_mode(definition: &TableDefinition, mode: Mode) -> RenderedOutput {
        let catalog = InMemoryCatalog::new()
            .with_item(CatalogItem::new(ItemId(1), "<Mug & Co>").with_permalink("/mug?a=1&b=2"))
            .with_item(CatalogItem::new(ItemId(2), "Plate").not_purchasable());
        Orchestrator::builder()
            .catalog(catalog)
            .build()
            .resolve_and_render(definition, mode, &RequestParams::new())
            .await
            .unwrap()
    }

    fn definition() -> TableDefinition {
        let mut definition = TableDefinition::default().with_columns(vec![
            Column::new("name", ColumnKind::Name(NameSettings::default())).with_visibility(Visibility::TabletUp),
            Column::new("buy", ColumnKind::AddToCart),
        ]);
        definition.settings.cart.enabled = true;
        definition.settings.features.bulk_select.enabled = true;
        definition.style.header.background = Some("#222".to_string());
        definition
    }

    #[tokio::test]
    async fn test_escapes_item_text() {
        let output = render_mode(&definition(), Mode::Embed).await;
        let html = render(&output, "pt-1");
        assert!(html.contains("&lt;Mug &amp; Co&gt;"));
        assert!(!html.contains("<Mug"));
        assert!(html.contains("href=\"/mug?a=1&amp;b=2\""));
    }

    #[tokio::test]
    async fn test_full_render_structure() {
        let output = render_mode(&definition(), Mode::Embed).await;
        let html = render(&output, "pt-1");
        assert!(html.starts_with("<style>\n#pt-1 thead th {"));
        assert!(html.contains("<table id=\"pt-1\" class=\"pt-table\">"));
        assert!(html.contains("pt-hide-mobile"));
        assert!(html.contains("<th class=\"pt-select\"></th>"));
        assert!(html.contains("value=\"1\""));
        assert!(html.contains("Unavailable"));
        // single page: no pagination controls
        assert!(!html.contains("pt-pagination"));
    }

    #[tokio::test]
    async fn test_refresh_renders_rows_only() {
        let output = render_mode(&definition(), Mode::Refresh).await;
        let html = render(&output, "pt-1");
        assert!(html.starts_with("<tr data-item=\"1\">"));
        assert!(!html.contains("<table"));
        assert!(!html.contains("<style>"));
    }
}
