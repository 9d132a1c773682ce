//! Export error types

/// Errors that can occur while exporting rendered rows.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The definition does not enable the export feature.
    #[error("export is disabled for this table")]
    Disabled,

    /// The output carries no header row (asynchronous refresh output).
    #[error("output has no headers; export requires an embed or preview render")]
    MissingHeaders,

    /// CSV encoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the buffer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The encoded buffer was not valid UTF-8.
    #[error("encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
