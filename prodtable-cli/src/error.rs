//! CLI error type

use std::path::PathBuf;

use prodtable_lib::error::ExportError;
use prodtable_lib::error::NormalizeError;
use prodtable_lib::error::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Render(#[from] prodtable_lib::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid definition: {0}")]
    Definition(#[from] NormalizeError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid catalog file: {0}")]
    Catalog(serde_json::Error),

    #[error("cannot encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no data directory available; pass --store")]
    NoDataDir,

    #[error("{0}")]
    Usage(String),
}
