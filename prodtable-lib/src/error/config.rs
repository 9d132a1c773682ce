//! Configuration error types

/// The definition is well-formed but semantically illegal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid configuration at {field}: {reason}")]
pub struct ConfigError {
    /// Path of the offending field.
    pub field: String,
    /// Human-readable reason.
    pub reason: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// A `combined` column lists another `combined` element.
    pub fn nested_combined(field: impl Into<String>) -> Self {
        Self::new(field, "combined columns cannot contain combined elements")
    }

    /// Two columns share an identifier.
    pub fn duplicate_column(field: impl Into<String>, id: &str) -> Self {
        Self::new(field, format!("duplicate column id '{}'", id))
    }
}
