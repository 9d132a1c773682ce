//! Non-fatal diagnostics recorded alongside successful output

use serde::Serialize;

use crate::model::ItemId;

/// The family a [`Diagnostic`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// The source resolved to less than its literal reading asks for
    /// (empty category set, unresolved explicit ids, unsupported sort field).
    ResolutionDegeneracy,
    /// A cell was rendered empty (unknown column type, missing value).
    RenderFallback,
    /// A runtime request parameter was ignored.
    IgnoredParameter,
}

/// A non-fatal signal attached to a render.
///
/// Diagnostics never abort a render; the caller decides whether to surface
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Diagnostic family.
    pub kind: DiagnosticKind,
    /// Human-readable message.
    pub message: String,
    /// Column the diagnostic concerns, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Catalog item the diagnostic concerns, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemId>,
}

impl Diagnostic {
    /// Creates a resolution degeneracy diagnostic.
    pub fn degeneracy(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::ResolutionDegeneracy,
            message: message.into(),
            column: None,
            item: None,
        }
    }

    /// Creates a render fallback diagnostic for one cell.
    pub fn render_fallback(column: impl Into<String>, item: ItemId, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::RenderFallback,
            message: message.into(),
            column: Some(column.into()),
            item: Some(item),
        }
    }

    /// Creates a diagnostic for an ignored request parameter.
    pub fn ignored(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::IgnoredParameter,
            message: message.into(),
            column: None,
            item: None,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.column, self.item) {
            (Some(column), Some(item)) => write!(f, "[{}] item {}: {}", column, item, self.message),
            (Some(column), None) => write!(f, "[{}] {}", column, self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}
