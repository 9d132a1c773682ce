//! Style compilation
//!
//! [`compile`] maps style tokens to an ordered list of region rules plus
//! class tokens. Absent tokens produce no declaration so the host's own
//! fallback applies.

use serde::Serialize;

use crate::model::BorderStyle;
use crate::model::BodyStyle;
use crate::model::Style;

/// A stylable region of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    /// The table element.
    Table,
    /// Every heading and body cell.
    Cells,
    /// Heading cells.
    Header,
    /// Body cells.
    Body,
    /// Body cells of every other row.
    AlternateRow,
    /// Body cells of the hovered row.
    HoverRow,
    /// Cart buttons.
    Button,
}

impl Region {
    /// Returns the CSS selector of the region under a scope selector.
    pub fn selector(&self, scope: &str) -> String {
        match self {
            Region::Table => scope.to_string(),
            Region::Cells => format!("{scope} th, {scope} td"),
            Region::Header => format!("{scope} thead th"),
            Region::Body => format!("{scope} tbody td"),
            Region::AlternateRow => format!("{scope} tbody tr:nth-child(even) td"),
            Region::HoverRow => format!("{scope} tbody tr:hover td"),
            Region::Button => format!("{scope} .pt-cart-button"),
        }
    }
}

/// One CSS declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Property name.
    pub property: &'static str,
    /// Value.
    pub value: String,
}

/// The declarations of one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Region.
    pub region: Region,
    /// Declarations, in emission order.
    pub declarations: Vec<Declaration>,
}

/// The compiled presentation of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresentationDescriptor {
    /// Region rules in a fixed order; regions without declarations are omitted.
    pub rules: Vec<Rule>,
    /// Class tokens for the table element.
    pub classes: Vec<String>,
}

impl PresentationDescriptor {
    /// Returns `true` if nothing was compiled.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.classes.is_empty()
    }

    /// Returns the rule of a region.
    pub fn rule(&self, region: Region) -> Option<&Rule> {
        self.rules.iter().find(|r| r.region == region)
    }

    /// Renders a stylesheet scoped under a selector.
    ///
    /// # Example
    ///
    /// ```
    /// use prodtable_lib::model::Style;
    /// use prodtable_lib::style::compile;
    ///
    /// let mut style = Style::default();
    /// style.header.background = Some("#222".to_string());
    /// let css = compile(&style).to_css("#pt-1");
    /// assert_eq!(css, "#pt-1 thead th {\n  background-color: #222;\n}\n");
    /// ```
    pub fn to_css(&self, scope: &str) -> String {
        let mut css = String::new();
        for rule in &self.rules {
            css.push_str(&rule.region.selector(scope));
            css.push_str(" {\n");
            for declaration in &rule.declarations {
                css.push_str("  ");
                css.push_str(declaration.property);
                css.push_str(": ");
                css.push_str(&declaration.value);
                css.push_str(";\n");
            }
            css.push_str("}\n");
        }
        css
    }
}

/// Collects declarations for one region.
#[derive(Default)]
struct Declarations(Vec<Declaration>);

impl Declarations {
    fn push(&mut self, property: &'static str, value: Option<String>) {
        if let Some(value) = value.as_deref().map(sanitize).filter(|v| !v.is_empty()) {
            self.0.push(Declaration { property, value });
        }
    }

    fn px(&mut self, property: &'static str, value: Option<u32>) {
        self.push(property, value.map(|v| format!("{}px", v)));
    }

    fn into_rule(self, region: Region, rules: &mut Vec<Rule>) {
        if !self.0.is_empty() {
            rules.push(Rule {
                region,
                declarations: self.0,
            });
        }
    }
}

/// Strips characters that could escape a declaration.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '\\'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Compiles style tokens into a presentation descriptor.
pub fn compile(style: &Style) -> PresentationDescriptor {
    let mut rules = Vec::new();

    let mut table = Declarations::default();
    table.px("max-width", style.layout.max_width);
    table.push("font-family", style.typography.font_family.clone());
    table.px("font-size", style.typography.font_size);
    table.push("line-height", style.typography.line_height.map(|v| v.normalize().to_string()));
    table.into_rule(Region::Table, &mut rules);

    let mut cells = Declarations::default();
    cells.px("padding", style.layout.cell_padding);
    cells.push("text-align", style.layout.alignment.map(|a| a.as_str().to_string()));
    cells.into_rule(Region::Cells, &mut rules);

    let mut header = Declarations::default();
    header.push("background-color", style.header.background.clone());
    header.push("color", style.header.text_color.clone());
    header.px("font-size", style.header.font_size);
    header.push(
        "font-weight",
        style.header.bold.map(|bold| if bold { "bold" } else { "normal" }.to_string()),
    );
    header.into_rule(Region::Header, &mut rules);

    let mut body = Declarations::default();
    body.push("background-color", style.body.background.clone());
    body.push("color", style.body.text_color.clone());
    border(&style.body, &mut body);
    body.into_rule(Region::Body, &mut rules);

    let mut alternate = Declarations::default();
    alternate.push("background-color", style.body.alternate_background.clone());
    alternate.into_rule(Region::AlternateRow, &mut rules);

    if style.hover.enabled == Some(true) {
        let mut hover = Declarations::default();
        hover.push("background-color", style.hover.background.clone());
        hover.push("color", style.hover.text_color.clone());
        hover.into_rule(Region::HoverRow, &mut rules);
    }

    let mut button = Declarations::default();
    button.push("background-color", style.button.background.clone());
    button.push("color", style.button.text_color.clone());
    button.px("border-radius", style.button.border_radius);
    button.into_rule(Region::Button, &mut rules);

    let mut classes = Vec::new();
    if let Some(mode) = style.responsive.mode {
        classes.push(format!("pt-responsive-{}", mode.as_str()));
    }
    if style.hover.enabled == Some(true) {
        classes.push("pt-hover".to_string());
    }

    PresentationDescriptor { rules, classes }
}

/// Emits the `border` shorthand when a style is set, longhands otherwise.
fn border(body: &BodyStyle, out: &mut Declarations) {
    match body.border_style {
        Some(BorderStyle::None) => out.push("border", Some("none".to_string())),
        Some(line) => {
            let mut value = format!("{}px {}", body.border_width.unwrap_or(1), line.as_str());
            if let Some(color) = &body.border_color {
                value.push(' ');
                value.push_str(color);
            }
            out.push("border", Some(value));
        }
        None => {
            out.px("border-width", body.border_width);
            out.push("border-color", body.border_color.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::model::Alignment;
    use crate::model::ResponsiveMode;

    #[test]
    fn test_empty_style_compiles_to_nothing() {
        let descriptor = compile(&Style::default());
        assert!(descriptor.is_empty());
        assert_eq!(descriptor.to_css(".t"), "");
    }

    #[test]
    fn test_border_shorthand() {
        let mut style = Style::default();
        style.body.border_style = Some(BorderStyle::Dashed);
        style.body.border_color = Some("#ccc".to_string());
        let descriptor = compile(&style);
        let body = descriptor.rule(Region::Body).unwrap();
        assert_eq!(body.declarations[0].property, "border");
        assert_eq!(body.declarations[0].value, "1px dashed #ccc");

        style.body.border_style = None;
        style.body.border_width = Some(2);
        let descriptor = compile(&style);
        let properties: Vec<&str> = descriptor
            .rule(Region::Body)
            .unwrap()
            .declarations
            .iter()
            .map(|d| d.property)
            .collect();
        assert_eq!(properties, vec!["border-width", "border-color"]);
    }

    #[test]
    fn test_hover_flag_controls_hover_rules() {
        let mut style = Style::default();
        style.hover.background = Some("#ffe".to_string());
        assert!(compile(&style).rule(Region::HoverRow).is_none());

        style.hover.enabled = Some(true);
        let descriptor = compile(&style);
        assert!(descriptor.rule(Region::HoverRow).is_some());
        assert!(descriptor.classes.contains(&"pt-hover".to_string()));
    }

    #[test]
    fn test_rule_order_and_classes() {
        let mut style = Style::default();
        style.button.background = Some("red".to_string());
        style.layout.alignment = Some(Alignment::Center);
        style.typography.line_height = Some(Decimal::new(150, 2));
        style.responsive.mode = Some(ResponsiveMode::Stack);
        let descriptor = compile(&style);
        let regions: Vec<Region> = descriptor.rules.iter().map(|r| r.region).collect();
        assert_eq!(regions, vec![Region::Table, Region::Cells, Region::Button]);
        assert_eq!(descriptor.rules[0].declarations[0].value, "1.5");
        assert_eq!(descriptor.classes, vec!["pt-responsive-stack"]);
    }

    #[test]
    fn test_values_are_sanitized() {
        let mut style = Style::default();
        style.header.text_color = Some("red; } body { display: none".to_string());
        let css = compile(&style).to_css("#t");
        assert!(!css.contains("} body"));
        assert_eq!(css.matches('}').count(), 1);
    }
}
