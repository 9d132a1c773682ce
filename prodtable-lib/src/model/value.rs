//! Value enum for dynamic meta values

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

/// A dynamic value stored under a catalog item's meta key.
///
/// Custom-field columns render these, and sort overrides on custom-field
/// columns compare them.
///
/// # Example
///
/// ```
/// use prodtable_lib::model::Value;
///
/// let weight = Value::from(12i64);
/// let color = Value::from("red");
/// assert_eq!(weight.to_display_string(), "12");
/// assert!(Value::Null.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "serde_json::Value")]
pub enum Value {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// Arbitrary precision decimal.
    Decimal(Decimal),
    /// String value.
    String(String),
    /// Date and time.
    DateTime(DateTime<Utc>),
    /// List of values (multi-value meta).
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for null, empty strings and empty lists.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::List(items) => items.iter().all(Value::is_blank),
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
        }
    }

    /// Returns the numeric value, if this is a number.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(v) => Some(Decimal::from(*v)),
            Value::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// Renders the value as display text.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "Yes".to_string(),
            Value::Bool(false) => "No".to_string(),
            Value::Int(v) => v.to_string(),
            Value::Decimal(v) => v.normalize().to_string(),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d").to_string(),
            Value::List(items) => items
                .iter()
                .filter(|v| !v.is_blank())
                .map(Value::to_display_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Orders two values for sorting, blanks last.
    ///
    /// Non-blank values rank by class first: numbers, then datetimes, then
    /// everything else by lowercase display text. Each class is compared
    /// within itself, so mixed meta values still form a total order.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self.is_blank(), other.is_blank()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }
        self.sort_key().cmp(&other.sort_key())
    }

    fn sort_key(&self) -> SortKey {
        if let Some(number) = self.as_decimal() {
            return SortKey::Number(number);
        }
        match self {
            Value::DateTime(dt) => SortKey::Time(*dt),
            other => SortKey::Text(other.to_display_string().to_lowercase()),
        }
    }
}

/// Comparable form of a non-blank [`Value`]; variant order is class order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(Decimal),
    Time(DateTime<Utc>),
    Text(String),
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n
                    .to_string()
                    .parse::<Decimal>()
                    .or_else(|_| Decimal::from_scientific(&n.to_string()))
                    .map(Value::Decimal)
                    .unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            other @ serde_json::Value::Object(_) => Value::String(other.to_string()),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Value::from(serde_json::json!(12)), Value::Int(12));
        assert_eq!(
            Value::from(serde_json::json!(2.5)),
            Value::Decimal(Decimal::new(25, 1))
        );
    }

    #[test]
    fn test_display_list_skips_blanks() {
        let value = Value::List(vec![Value::from("red"), Value::Null, Value::from("blue")]);
        assert_eq!(value.to_display_string(), "red, blue");
    }

    #[test]
    fn test_sort_cmp_numeric_and_blank_last() {
        assert_eq!(Value::Int(2).sort_cmp(&Value::Int(10)), Ordering::Less);
        assert_eq!(Value::Null.sort_cmp(&Value::Int(1)), Ordering::Greater);
        assert_eq!(Value::from("b").sort_cmp(&Value::from("A")), Ordering::Greater);
    }

    #[test]
    fn test_sort_cmp_ranks_numbers_before_text() {
        let nine = Value::Int(9);
        let ten = Value::Int(10);
        let text = Value::from("1a");

        assert_eq!(nine.sort_cmp(&ten), Ordering::Less);
        assert_eq!(ten.sort_cmp(&text), Ordering::Less);
        assert_eq!(nine.sort_cmp(&text), Ordering::Less);
        assert_eq!(text.sort_cmp(&nine), Ordering::Greater);
    }
}
