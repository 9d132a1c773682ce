//! Shape error types

/// A required discriminant is absent or not one of its closed values.
///
/// The `field` path points at the exact location in the raw input, e.g.
/// `columns[2].type` or `source.kind`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field}: found {found}, expected one of [{}]", .expected.join(", "))]
pub struct ShapeError {
    /// Path of the offending field.
    pub field: String,
    /// What was found, rendered for display (`<missing>` when absent).
    pub found: String,
    /// The closed set of accepted values.
    pub expected: &'static [&'static str],
}

impl ShapeError {
    /// Creates a new shape error.
    pub fn new(field: impl Into<String>, found: impl Into<String>, expected: &'static [&'static str]) -> Self {
        Self {
            field: field.into(),
            found: found.into(),
            expected,
        }
    }

    /// Creates a shape error for a discriminant that is absent.
    pub fn missing(field: impl Into<String>, expected: &'static [&'static str]) -> Self {
        Self::new(field, "<missing>", expected)
    }
}
