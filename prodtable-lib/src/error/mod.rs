//! Error types

mod catalog;
mod config;
mod diagnostic;
mod export;
mod shape;
mod store;

pub use catalog::*;
pub use config::*;
pub use diagnostic::*;
pub use export::*;
pub use shape::*;
pub use store::*;

/// Errors raised while turning raw input into a [`TableDefinition`](crate::model::TableDefinition).
///
/// Both variants abort before any catalog call is made.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    /// A required discriminant is absent or outside its closed set.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// The input is well-formed but semantically illegal.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl NormalizeError {
    /// Returns the path of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::Shape(e) => &e.field,
            Self::Config(e) => &e.field,
        }
    }
}

/// Top-level error for a resolve/render cycle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required discriminant absent or invalid.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Structurally valid but semantically illegal definition.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The catalog collaborator failed; no partial output is produced.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),

    /// Definition persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Export failed or is disabled for this definition.
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<NormalizeError> for Error {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Shape(e) => Self::Shape(e),
            NormalizeError::Config(e) => Self::Config(e),
        }
    }
}

impl Error {
    /// Returns `true` if the error was raised during normalization.
    pub fn is_definition_error(&self) -> bool {
        matches!(self, Self::Shape(_) | Self::Config(_))
    }

    /// Returns `true` if the next preview cycle may succeed without the
    /// definition changing.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::CatalogUnavailable(e) => e.is_retryable(),
            _ => false,
        }
    }
}
