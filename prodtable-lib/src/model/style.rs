//! Style tokens
//!
//! Pure data grouped by region. Every token is optional; the style compiler
//! omits absent tokens so the rendering surface can apply its own fallback.

use rust_decimal::Decimal;
use serde::Serialize;

/// Border line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// No borders.
    None,
    /// Solid lines.
    Solid,
    /// Dashed lines.
    Dashed,
    /// Dotted lines.
    Dotted,
}

impl BorderStyle {
    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "solid" => Some(Self::Solid),
            "dashed" => Some(Self::Dashed),
            "dotted" => Some(Self::Dotted),
            _ => None,
        }
    }

    /// Returns the CSS keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
        }
    }
}

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left.
    Left,
    /// Center.
    Center,
    /// Right.
    Right,
}

impl Alignment {
    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// Returns the CSS keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// How the table adapts to narrow screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsiveMode {
    /// Horizontal scrolling.
    Scroll,
    /// Each row becomes a stacked card.
    Stack,
    /// Hidden columns collapse into an expandable row.
    Collapse,
}

impl ResponsiveMode {
    /// Parses the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scroll" => Some(Self::Scroll),
            "stack" => Some(Self::Stack),
            "collapse" => Some(Self::Collapse),
            _ => None,
        }
    }

    /// Returns the persisted string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Stack => "stack",
            Self::Collapse => "collapse",
        }
    }
}

/// Header row tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderStyle {
    /// Background color.
    pub background: Option<String>,
    /// Text color.
    pub text_color: Option<String>,
    /// Font size in pixels.
    pub font_size: Option<u32>,
    /// Bold heading text.
    pub bold: Option<bool>,
}

/// Body row tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyStyle {
    /// Background color.
    pub background: Option<String>,
    /// Background of every other row.
    pub alternate_background: Option<String>,
    /// Text color.
    pub text_color: Option<String>,
    /// Border line style.
    pub border_style: Option<BorderStyle>,
    /// Border width in pixels.
    pub border_width: Option<u32>,
    /// Border color.
    pub border_color: Option<String>,
}

/// Cart button tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonStyle {
    /// Background color.
    pub background: Option<String>,
    /// Text color.
    pub text_color: Option<String>,
    /// Corner radius in pixels.
    pub border_radius: Option<u32>,
}

/// Table layout tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStyle {
    /// Maximum table width in pixels.
    pub max_width: Option<u32>,
    /// Cell padding in pixels.
    pub cell_padding: Option<u32>,
    /// Cell text alignment.
    pub alignment: Option<Alignment>,
}

/// Typography tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    /// Font family stack.
    pub font_family: Option<String>,
    /// Font size in pixels.
    pub font_size: Option<u32>,
    /// Unitless line height.
    pub line_height: Option<Decimal>,
}

/// Row hover tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverStyle {
    /// Whether hover declarations are emitted.
    pub enabled: Option<bool>,
    /// Hover background color.
    pub background: Option<String>,
    /// Hover text color.
    pub text_color: Option<String>,
}

/// Responsive behaviour tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResponsiveStyle {
    /// Responsive mode.
    pub mode: Option<ResponsiveMode>,
}

/// Presentation tokens of a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Style {
    /// Header row.
    pub header: HeaderStyle,
    /// Body rows.
    pub body: BodyStyle,
    /// Cart buttons.
    pub button: ButtonStyle,
    /// Table layout.
    pub layout: LayoutStyle,
    /// Typography.
    pub typography: Typography,
    /// Row hover.
    pub hover: HoverStyle,
    /// Responsive behaviour.
    pub responsive: ResponsiveStyle,
}
