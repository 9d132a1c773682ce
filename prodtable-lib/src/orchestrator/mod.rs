//! Resolve/render orchestration
//!
//! The [`Orchestrator`] runs one cycle per call: resolve the source, run
//! the feature pipeline, render every cell, and compile the style. Each
//! call is independent; the orchestrator holds no per-request state and is
//! cheap to clone.
//!
//! Live editing goes through a [`PreviewSession`], which debounces edits
//! and cancels superseded cycles.

mod config;
mod output;
mod preview;

pub use config::*;
pub use output::*;
pub use preview::*;

use std::sync::Arc;

use serde_json::Value as Json;

use crate::catalog::Catalog;
use crate::catalog::CatalogContext;
use crate::catalog::CurrencyFormat;
use crate::error::CatalogError;
use crate::error::Diagnostic;
use crate::error::Error;
use crate::model::TableDefinition;
use crate::normalize::normalize;
use crate::pipeline::layout;
use crate::pipeline::FeaturePipeline;
use crate::pipeline::PipelineOutput;
use crate::pipeline::RequestParams;
use crate::render::render;
use crate::render::RenderContext;
use crate::source;
use crate::style;

/// Runs resolve/render cycles against a catalog.
///
/// # Example
///
/// ```
/// use prodtable_lib::catalog::InMemoryCatalog;
/// use prodtable_lib::model::{CatalogItem, Column, ColumnKind, ItemId, TableDefinition};
/// use prodtable_lib::orchestrator::{Mode, Orchestrator};
/// use prodtable_lib::pipeline::RequestParams;
///
/// # tokio_test_block_on(async {
/// let catalog = InMemoryCatalog::new().with_item(CatalogItem::new(ItemId(1), "Mug").with_sku("M-1"));
/// let orchestrator = Orchestrator::builder().catalog(catalog).build();
///
/// let definition = TableDefinition::default().with_columns(vec![Column::new("sku", ColumnKind::Sku)]);
/// let output = orchestrator
///     .resolve_and_render(&definition, Mode::Embed, &RequestParams::new())
///     .await
///     .unwrap();
/// assert_eq!(output.rows.len(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<OrchestratorInner>,
}

struct OrchestratorInner {
    catalog: Arc<dyn Catalog>,
    render: RenderConfig,
    preview: PreviewConfig,
}

impl Orchestrator {
    /// Creates a new builder for constructing an orchestrator.
    pub fn builder() -> OrchestratorBuilder<Missing> {
        OrchestratorBuilder::new()
    }

    /// Resolves and renders a definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CatalogUnavailable`] if the catalog fails; no
    /// partial output is produced. Diagnostics are returned in the output
    /// and logged at warn level.
    pub async fn resolve_and_render(
        &self,
        definition: &TableDefinition,
        mode: Mode,
        params: &RequestParams,
    ) -> Result<RenderedOutput, Error> {
        let context =
            CatalogContext::new(self.inner.catalog.as_ref()).with_timeout(self.inner.render.catalog_timeout);
        let gathered = gather(definition, params, &context).await?;
        let output = assemble(definition, mode, gathered);
        log_diagnostics(&output);
        Ok(output)
    }

    /// Normalizes raw input, then resolves and renders it.
    ///
    /// Shape and configuration errors abort before the catalog is called.
    pub async fn render_raw(&self, raw: &Json, mode: Mode, params: &RequestParams) -> Result<RenderedOutput, Error> {
        let definition = normalize(raw)?;
        self.resolve_and_render(&definition, mode, params).await
    }

    /// Starts a live preview session.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn preview_session(&self) -> PreviewSession {
        PreviewSession::spawn(self.inner.catalog.clone(), self.inner.preview.clone())
    }

    /// Returns the render configuration.
    pub fn render_config(&self) -> &RenderConfig {
        &self.inner.render
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("render", &self.inner.render)
            .field("preview", &self.inner.preview)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`Orchestrator`].
///
/// The catalog is required; `build` is only available once it is set.
pub struct OrchestratorBuilder<C> {
    catalog: C,
    render: RenderConfig,
    preview: PreviewConfig,
}

impl OrchestratorBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            catalog: Missing,
            render: RenderConfig::default(),
            preview: PreviewConfig::default(),
        }
    }

    /// Sets the catalog.
    pub fn catalog<T: Catalog + 'static>(self, catalog: T) -> OrchestratorBuilder<Set<Arc<dyn Catalog>>> {
        self.shared_catalog(Arc::new(catalog))
    }

    /// Sets a shared catalog.
    pub fn shared_catalog(self, catalog: Arc<dyn Catalog>) -> OrchestratorBuilder<Set<Arc<dyn Catalog>>> {
        OrchestratorBuilder {
            catalog: Set(catalog),
            render: self.render,
            preview: self.preview,
        }
    }
}

impl Default for OrchestratorBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> OrchestratorBuilder<C> {
    /// Sets the render configuration.
    pub fn render_config(mut self, config: RenderConfig) -> Self {
        self.render = config;
        self
    }

    /// Sets the preview configuration.
    pub fn preview_config(mut self, config: PreviewConfig) -> Self {
        self.preview = config;
        self
    }
}

impl OrchestratorBuilder<Set<Arc<dyn Catalog>>> {
    /// Builds the [`Orchestrator`].
    pub fn build(self) -> Orchestrator {
        Orchestrator {
            inner: Arc::new(OrchestratorInner {
                catalog: self.catalog.0,
                render: self.render,
                preview: self.preview,
            }),
        }
    }
}

// =============================================================================
// Cycle
// =============================================================================

/// Everything a cycle fetched from the catalog.
pub(crate) struct Gathered {
    resolution: Vec<Diagnostic>,
    pipeline: PipelineOutput,
    currency: CurrencyFormat,
}

/// Resolves the source and runs the feature pipeline.
///
/// Only the current page is projected when no pipeline step needs item
/// data.
pub(crate) async fn gather(
    definition: &TableDefinition,
    params: &RequestParams,
    context: &CatalogContext<'_>,
) -> Result<Gathered, CatalogError> {
    let resolution = source::resolve(&definition.source, context).await?;
    let pipeline = FeaturePipeline::new(definition, params);

    let output = if pipeline.requires_projection() {
        let candidates = context.project(&resolution.items).await?;
        pipeline.run(candidates)
    } else {
        let (ids, pagination) = pipeline.page_ids(&resolution.items, resolution.total);
        let rows = context.project(&ids).await?;
        pipeline.finish(rows, pagination)
    };

    Ok(Gathered {
        resolution: resolution.diagnostics,
        pipeline: output,
        currency: context.currency(),
    })
}

/// Renders gathered rows for a mode.
pub(crate) fn assemble(definition: &TableDefinition, mode: Mode, gathered: Gathered) -> RenderedOutput {
    let Gathered {
        resolution,
        pipeline,
        currency,
    } = gathered;

    let slots = layout(&definition.columns);
    let context = RenderContext::new(currency, definition.settings.cart.clone());
    let mut diagnostics = resolution;
    diagnostics.extend(pipeline.diagnostics);

    let mut rows = Vec::with_capacity(pipeline.rows.len());
    for (item, decoration) in pipeline.rows.iter().zip(pipeline.decorations) {
        let mut cells = Vec::with_capacity(slots.len());
        for slot in &slots {
            let column = &definition.columns[slot.index];
            let rendered = render(column, item, &context);
            diagnostics.extend(rendered.diagnostics);
            cells.push(Cell {
                column: column.id.clone(),
                content: rendered.content,
                classes: slot.classes.clone(),
            });
        }
        rows.push(Row {
            item: item.id,
            cells,
            decoration,
        });
    }

    let headers = if mode.is_full() {
        slots
            .iter()
            .map(|slot| {
                let column = &definition.columns[slot.index];
                HeaderCell {
                    column: column.id.clone(),
                    text: if column.advanced.show_heading {
                        column.heading.clone()
                    } else {
                        String::new()
                    },
                    column_type: column.kind.type_name().to_string(),
                    width: column.advanced.width.to_css(),
                    sortable: definition.settings.features.sorting && column.kind.is_sortable(),
                    classes: slot.classes.clone(),
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    let bulk = &definition.settings.features.bulk_select;
    RenderedOutput {
        mode,
        definition: definition.id,
        title: definition.title.clone(),
        headers,
        rows,
        pagination: pipeline.pagination,
        presentation: mode.is_full().then(|| style::compile(&definition.style)),
        selection: bulk.enabled.then_some(bulk.position),
        facets: if mode.is_full() { pipeline.facets } else { Vec::new() },
        diagnostics,
    }
}

fn log_diagnostics(output: &RenderedOutput) {
    for diagnostic in &output.diagnostics {
        log::warn!("[{}] {}", output.title, diagnostic);
    }
}
