//! CSV export of rendered tables

use crate::error::ExportError;
use crate::model::ColumnKind;
use crate::model::Settings;
use crate::orchestrator::RenderedOutput;

/// Writes the current page of a rendered table as CSV.
///
/// The first record holds the headings; each row is flattened with
/// [`CellContent::to_plain_text`](crate::render::CellContent::to_plain_text).
/// Action columns are left out.
///
/// # Errors
///
/// - [`ExportError::Disabled`] if the definition does not enable export
/// - [`ExportError::MissingHeaders`] for refresh output
pub fn to_csv(settings: &Settings, output: &RenderedOutput) -> Result<String, ExportError> {
    if !settings.features.export {
        return Err(ExportError::Disabled);
    }
    if !output.mode.is_full() {
        return Err(ExportError::MissingHeaders);
    }

    let action = ColumnKind::AddToCart.type_name();
    let keep: Vec<usize> = output
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| header.column_type != action)
        .map(|(index, _)| index)
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(keep.iter().map(|&i| output.headers[i].text.as_str()))?;
    for row in &output.rows {
        let record: Vec<String> = keep
            .iter()
            .map(|&i| row.cells.get(i).map(|c| c.content.to_plain_text()).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    let buffer = writer.into_inner().map_err(|e| e.into_error())?;
    log::debug!("Exported {} rows of '{}'", output.rows.len(), output.title);
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::model::CatalogItem;
    use crate::model::Column;
    use crate::model::ItemId;
    use crate::model::Money;
    use crate::model::TableDefinition;
    use crate::orchestrator::Mode;
    use crate::orchestrator::Orchestrator;
    use crate::pipeline::RequestParams;

    fn definition(export: bool) -> TableDefinition {
        let mut definition = TableDefinition::default().with_columns(vec![
            Column::new("sku", ColumnKind::Sku).with_heading("SKU"),
            Column::new("buy", ColumnKind::AddToCart),
            Column::new("price", ColumnKind::Price).with_heading("Price, USD"),
        ]);
        definition.settings.features.export = export;
        definition
    }

    async fn render(definition: &TableDefinition, mode: Mode) -> RenderedOutput {
        let catalog = InMemoryCatalog::new().with_item(
            CatalogItem::new(ItemId(1), "Mug")
                .with_sku("M-1")
                .with_prices(Money::from_int(25), Some(Money::from_int(18))),
        );
        Orchestrator::builder()
            .catalog(catalog)
            .build()
            .resolve_and_render(definition, mode, &RequestParams::new())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_exports_plain_text_without_actions() {
        let definition = definition(true);
        let output = render(&definition, Mode::Embed).await;
        let csv = to_csv(&definition.settings, &output).unwrap();
        assert_eq!(csv, "SKU,\"Price, USD\"\nM-1,$18.00\n");
    }

    #[tokio::test]
    async fn test_disabled_export() {
        let definition = definition(false);
        let output = render(&definition, Mode::Embed).await;
        assert!(matches!(to_csv(&definition.settings, &output), Err(ExportError::Disabled)));
    }

    #[tokio::test]
    async fn test_refresh_output_has_no_headers() {
        let definition = definition(true);
        let output = render(&definition, Mode::Refresh).await;
        assert!(matches!(
            to_csv(&definition.settings, &output),
            Err(ExportError::MissingHeaders)
        ));
    }
}
