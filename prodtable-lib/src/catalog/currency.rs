//! Currency formatting

use rust_decimal::RoundingStrategy;
use serde::Deserialize;
use serde::Serialize;

use crate::model::Money;

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolPosition {
    /// `$9.99`
    #[default]
    Left,
    /// `9.99$`
    Right,
    /// `$ 9.99`
    LeftSpace,
    /// `9.99 €`
    RightSpace,
}

/// Currency display rules supplied by the catalog.
///
/// # Example
///
/// ```
/// use prodtable_lib::catalog::{CurrencyFormat, SymbolPosition};
/// use prodtable_lib::model::Money;
///
/// let euro = CurrencyFormat::new("€")
///     .with_position(SymbolPosition::RightSpace)
///     .with_separators(",", ".");
/// assert_eq!(euro.format(Money::from_cents(123456)), "1.234,56 €");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrencyFormat {
    /// Currency symbol.
    pub symbol: String,
    /// Symbol position.
    pub position: SymbolPosition,
    /// Number of decimal places.
    pub decimals: u32,
    /// Decimal separator.
    pub decimal_separator: String,
    /// Thousands separator; empty for none.
    pub thousands_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            position: SymbolPosition::Left,
            decimals: 2,
            decimal_separator: ".".to_string(),
            thousands_separator: ",".to_string(),
        }
    }
}

impl CurrencyFormat {
    /// Creates a format with the given symbol and default rules.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Sets the symbol position.
    pub fn with_position(mut self, position: SymbolPosition) -> Self {
        self.position = position;
        self
    }

    /// Sets the number of decimal places.
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Sets the decimal and thousands separators.
    pub fn with_separators(mut self, decimal: impl Into<String>, thousands: impl Into<String>) -> Self {
        self.decimal_separator = decimal.into();
        self.thousands_separator = thousands.into();
        self
    }

    /// Formats an amount, rounding half away from zero.
    pub fn format(&self, amount: Money) -> String {
        let mut rounded = amount
            .value()
            .round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(self.decimals);

        let text = rounded.abs().to_string();
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (text.as_str(), None),
        };

        let mut number = String::new();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            number.push('-');
        }
        number.push_str(&group_thousands(whole, &self.thousands_separator));
        if let Some(fraction) = fraction {
            number.push_str(&self.decimal_separator);
            number.push_str(fraction);
        }

        match self.position {
            SymbolPosition::Left => format!("{}{}", self.symbol, number),
            SymbolPosition::Right => format!("{}{}", number, self.symbol),
            SymbolPosition::LeftSpace => format!("{} {}", self.symbol, number),
            SymbolPosition::RightSpace => format!("{} {}", number, self.symbol),
        }
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(digits.len() + len / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}
