//! Subcommand implementations

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use prodtable_lib::catalog::InMemoryCatalog;
use prodtable_lib::export;
use prodtable_lib::html;
use prodtable_lib::model::DefinitionId;
use prodtable_lib::model::Status;
use prodtable_lib::model::TableDefinition;
use prodtable_lib::normalize::normalize_str;
use prodtable_lib::orchestrator::Mode;
use prodtable_lib::orchestrator::Orchestrator;
use prodtable_lib::orchestrator::PreviewConfig;
use prodtable_lib::orchestrator::RenderedOutput;
use prodtable_lib::pipeline::RequestParams;
use prodtable_lib::pipeline::SortOverride;
use prodtable_lib::store::DefinitionStore;
use prodtable_lib::store::ListFilter;
use prodtable_lib::store::SqliteStore;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use crate::Format;
use crate::error::CliError;
use crate::paths;

/// Paths shared by every subcommand.
pub struct Context {
    store: Option<PathBuf>,
    catalog: Option<PathBuf>,
}

impl Context {
    pub fn new(store: Option<PathBuf>, catalog: Option<PathBuf>) -> Self {
        Self { store, catalog }
    }

    async fn open_store(&self) -> Result<SqliteStore, CliError> {
        let path = match &self.store {
            Some(path) => path.clone(),
            None => paths::definitions_db().ok_or(CliError::NoDataDir)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        log::debug!("Opening definition store at {}", path.display());
        Ok(SqliteStore::open(&path).await?)
    }

    fn orchestrator(&self, preview: PreviewConfig) -> Result<Orchestrator, CliError> {
        let catalog = match &self.catalog {
            Some(path) => {
                let text = read(path)?;
                InMemoryCatalog::from_json(&text).map_err(CliError::Catalog)?
            }
            None => {
                log::warn!("No --catalog given, rendering against an empty catalog");
                InMemoryCatalog::new()
            }
        };
        log::info!("Loaded catalog with {} items", catalog.len());
        Ok(Orchestrator::builder().catalog(catalog).preview_config(preview).build())
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_file(path: &Path) -> Result<TableDefinition, CliError> {
    Ok(normalize_str(&read(path)?)?)
}

pub async fn save(ctx: &Context, file: &Path) -> Result<(), CliError> {
    let definition = load_file(file)?;
    let store = ctx.open_store().await?;
    let saved = store.save(definition).await?;
    if let Some(summary) = saved.summary() {
        println!(
            "Saved definition {} '{}' (revision {}, {} columns)",
            summary.id, summary.title, summary.revision, summary.column_count
        );
    }
    Ok(())
}

pub async fn get(ctx: &Context, id: u64) -> Result<(), CliError> {
    let store = ctx.open_store().await?;
    let definition = store.get(DefinitionId(id)).await?;
    println!("{}", serde_json::to_string_pretty(&definition)?);
    Ok(())
}

pub async fn list(ctx: &Context, status: Option<Status>, search: Option<String>) -> Result<(), CliError> {
    let mut filter = ListFilter::new();
    if let Some(status) = status {
        filter = filter.with_status(status);
    }
    if let Some(search) = search {
        filter = filter.with_search(search);
    }

    let store = ctx.open_store().await?;
    let summaries = store.list(&filter).await?;
    if summaries.is_empty() {
        println!("No definitions.");
    }
    for summary in summaries {
        println!(
            "{:>4}  {:<9}  rev {:<3}  {:>2} cols  {}",
            summary.id,
            summary.status.as_str(),
            summary.revision,
            summary.column_count,
            summary.title
        );
    }
    Ok(())
}

pub async fn delete(ctx: &Context, id: u64) -> Result<(), CliError> {
    let store = ctx.open_store().await?;
    store.delete(DefinitionId(id)).await?;
    println!("Deleted definition {}", id);
    Ok(())
}

/// Arguments of the `render` subcommand.
pub struct RenderRequest {
    pub id: Option<u64>,
    pub file: Option<PathBuf>,
    pub mode: Mode,
    pub page: Option<usize>,
    pub search: Option<String>,
    pub sort: Option<SortOverride>,
    pub format: Format,
}

pub async fn render(ctx: &Context, request: RenderRequest) -> Result<(), CliError> {
    let definition = match (&request.file, request.id) {
        (Some(file), _) => load_file(file)?,
        (None, Some(id)) => ctx.open_store().await?.get(DefinitionId(id)).await?,
        (None, None) => return Err(CliError::Usage("pass a definition id or --file".to_string())),
    };

    let mut params = RequestParams::new();
    if let Some(page) = request.page {
        params = params.with_page(page);
    }
    if let Some(search) = request.search {
        params = params.with_search(search);
    }
    if let Some(sort) = request.sort {
        params = params.with_sort(sort);
    }

    let orchestrator = ctx.orchestrator(PreviewConfig::default())?;
    let output = orchestrator
        .resolve_and_render(&definition, request.mode, &params)
        .await?;
    print(&definition, &output, request.format)
}

fn print(definition: &TableDefinition, output: &RenderedOutput, format: Format) -> Result<(), CliError> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(output)?),
        Format::Html => {
            let id = match definition.id {
                Some(id) => format!("pt-{}", id),
                None => "pt-preview".to_string(),
            };
            print!("{}", html::render(output, &id));
        }
        Format::Csv => print!("{}", export::to_csv(&definition.settings, output)?),
    }
    Ok(())
}

/// Submits each stdin line as an edit and prints the surviving outputs.
///
/// After end of input, waits for the answer to the last edit.
pub async fn preview(ctx: &Context, debounce_ms: u64) -> Result<(), CliError> {
    let config = PreviewConfig::default().with_debounce(Duration::from_millis(debounce_ms));
    let orchestrator = ctx.orchestrator(config)?;
    let mut session = orchestrator.preview_session();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut last: Option<u64> = None;
    let mut input_open = true;
    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => match serde_json::from_str(&line) {
                    Ok(raw) => last = Some(session.submit(raw, RequestParams::new())),
                    Err(e) => eprintln!("Skipping line: not valid JSON: {}", e),
                },
                None => {
                    input_open = false;
                    if last.is_none() {
                        break;
                    }
                }
            },
            update = session.next_update() => {
                let Some(update) = update else { break };
                match update.result {
                    Ok(output) => println!("{}", serde_json::to_string(&output)?),
                    Err(e) => eprintln!("Preview {} failed: {}", update.seq, e),
                }
                if !input_open && last == Some(update.seq) {
                    break;
                }
            }
        }
    }

    session.close();
    Ok(())
}
