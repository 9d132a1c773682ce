//! `prodtable` command-line host
//!
//! Stores product table definitions in SQLite and renders them against a
//! JSON catalog file.

mod commands;
mod error;
mod logging;
mod paths;

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use prodtable_lib::model::Status;
use prodtable_lib::orchestrator::Mode;
use prodtable_lib::pipeline::SortOverride;

use error::CliError;

#[derive(Parser)]
#[command(name = "prodtable")]
#[command(about = "Manage and render product table definitions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Definitions database (defaults to the platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    /// JSON catalog file to render against (defaults to an empty catalog)
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Save a definition from a JSON file
    Save {
        /// Definition file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print a stored definition as JSON
    Get {
        /// Definition id
        id: u64,
    },

    /// List stored definitions
    List {
        /// Only definitions with this status (draft or published)
        #[arg(long, value_parser = parse_status)]
        status: Option<Status>,

        /// Only titles containing this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Delete a stored definition
    Delete {
        /// Definition id
        id: u64,
    },

    /// Render a stored definition or a definition file
    Render {
        /// Definition id
        #[arg(required_unless_present = "file")]
        id: Option<u64>,

        /// Render a definition file instead of a stored definition
        #[arg(long, conflicts_with = "id", value_name = "FILE")]
        file: Option<PathBuf>,

        /// Render mode: embed, refresh or preview
        #[arg(long, default_value = "embed")]
        mode: Mode,

        /// Page number
        #[arg(long)]
        page: Option<usize>,

        /// Free-text search term
        #[arg(long)]
        search: Option<String>,

        /// Sort override as `column` or `column:asc|desc`
        #[arg(long, value_name = "COLUMN[:DIR]")]
        sort: Option<SortOverride>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Live preview: reads one JSON definition per stdin line
    Preview {
        /// Debounce window in milliseconds
        #[arg(long, default_value_t = 400)]
        debounce_ms: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Html,
    Csv,
}

fn parse_status(s: &str) -> Result<Status, String> {
    Status::parse(s).ok_or_else(|| format!("unknown status '{}'", s))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        log::error!(target: logging::FILE_ONLY_TARGET, "{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = commands::Context::new(cli.store, cli.catalog);
    match cli.command {
        Command::Save { file } => commands::save(&ctx, &file).await,
        Command::Get { id } => commands::get(&ctx, id).await,
        Command::List { status, search } => commands::list(&ctx, status, search).await,
        Command::Delete { id } => commands::delete(&ctx, id).await,
        Command::Render {
            id,
            file,
            mode,
            page,
            search,
            sort,
            format,
        } => {
            let request = commands::RenderRequest {
                id,
                file,
                mode,
                page,
                search,
                sort,
                format,
            };
            commands::render(&ctx, request).await
        }
        Command::Preview { debounce_ms } => commands::preview(&ctx, debounce_ms).await,
    }
}
