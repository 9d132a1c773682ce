//! Path-tracking reader over raw JSON input.
//!
//! Lookups never fail: an absent key, or a value of the wrong JSON type,
//! reads as `None` so the caller falls back to its default. Only
//! [`Node::discriminant`] reports errors, with the exact field path.

use rust_decimal::Decimal;
use serde_json::Value as Json;

use crate::error::ShapeError;

#[derive(Debug, Clone)]
pub(crate) struct Node<'a> {
    value: Option<&'a Json>,
    path: String,
}

impl<'a> Node<'a> {
    pub(crate) fn root(value: &'a Json) -> Self {
        Self {
            value: Some(value),
            path: String::new(),
        }
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    /// Descends into an object key.
    pub(crate) fn field(&self, key: &str) -> Node<'a> {
        let path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        };
        Node {
            value: self.value.and_then(|v| v.as_object()).and_then(|o| o.get(key)),
            path,
        }
    }

    /// Returns the first present key among aliases.
    pub(crate) fn field_any(&self, keys: &[&str]) -> Node<'a> {
        keys.iter()
            .map(|k| self.field(k))
            .find(Node::is_present)
            .unwrap_or_else(|| self.field(keys[0]))
    }

    /// Returns `true` if the value exists and is not JSON null.
    pub(crate) fn is_present(&self) -> bool {
        self.value.is_some_and(|v| !v.is_null())
    }

    /// Returns the elements of an array, or nothing.
    pub(crate) fn elements(&self) -> Vec<Node<'a>> {
        match self.value.and_then(|v| v.as_array()) {
            Some(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| Node {
                    value: Some(v),
                    path: format!("{}[{}]", self.path, i),
                })
                .collect(),
            None => Vec::new(),
        }
    }

    pub(crate) fn str(&self) -> Option<&'a str> {
        self.value.and_then(|v| v.as_str())
    }

    pub(crate) fn string(&self) -> Option<String> {
        self.str().map(str::to_string)
    }

    pub(crate) fn string_or(&self, default: &str) -> String {
        self.string().unwrap_or_else(|| default.to_string())
    }

    /// Reads a boolean; also accepts `"yes"`/`"no"`/`"1"`/`"0"` strings and 0/1.
    pub(crate) fn bool(&self) -> Option<bool> {
        match self.value? {
            Json::Bool(b) => Some(*b),
            Json::Number(n) => n.as_i64().map(|n| n != 0),
            Json::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Some(true),
                "false" | "no" | "0" | "off" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub(crate) fn bool_or(&self, default: bool) -> bool {
        self.bool().unwrap_or(default)
    }

    /// Reads an unsigned integer; numeric strings are accepted.
    pub(crate) fn u64(&self) -> Option<u64> {
        match self.value? {
            Json::Number(n) => n.as_u64(),
            Json::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub(crate) fn i64(&self) -> Option<i64> {
        match self.value? {
            Json::Number(n) => n.as_i64(),
            Json::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Reads a decimal from a number or a numeric string.
    pub(crate) fn decimal(&self) -> Option<Decimal> {
        let text = match self.value? {
            Json::Number(n) => n.to_string(),
            Json::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return None,
        };
        text.parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
    }

    /// Reads a list of ids from an array or a comma-separated string.
    ///
    /// Unparseable entries are skipped.
    pub(crate) fn id_list(&self) -> Vec<u64> {
        match self.value {
            Some(Json::Array(items)) => items
                .iter()
                .filter_map(|v| match v {
                    Json::Number(n) => n.as_u64(),
                    Json::String(s) => s.trim().parse().ok(),
                    _ => None,
                })
                .collect(),
            Some(Json::String(s)) => s.split(',').filter_map(|p| p.trim().parse().ok()).collect(),
            Some(Json::Number(n)) => n.as_u64().into_iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Reads a list of strings; a single string reads as one element.
    pub(crate) fn string_list(&self) -> Vec<String> {
        match self.value {
            Some(Json::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
            Some(Json::String(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// Reads a lenient enumerated option: unknown values fall back to `None`.
    pub(crate) fn parse_with<T>(&self, parse: fn(&str) -> Option<T>) -> Option<T> {
        self.str().and_then(parse)
    }

    /// Reads a required discriminant.
    ///
    /// Absent, non-string, or unknown values are a [`ShapeError`].
    pub(crate) fn discriminant<T>(
        &self,
        parse: fn(&str) -> Option<T>,
        expected: &'static [&'static str],
    ) -> Result<T, ShapeError> {
        match self.value {
            None | Some(Json::Null) => Err(ShapeError::missing(&self.path, expected)),
            Some(Json::String(s)) => parse(s).ok_or_else(|| ShapeError::new(&self.path, s.as_str(), expected)),
            Some(other) => Err(ShapeError::new(&self.path, other.to_string(), expected)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_paths() {
        let raw = json!({"columns": [{"type": "sku"}, {"type": "price"}]});
        let root = Node::root(&raw);
        let columns = root.field("columns").elements();
        assert_eq!(columns[1].field("type").path(), "columns[1].type");
    }

    #[test]
    fn test_wrong_types_read_as_absent() {
        let raw = json!({"limit": "ten", "enabled": [1]});
        let root = Node::root(&raw);
        assert_eq!(root.field("limit").u64(), None);
        assert_eq!(root.field("enabled").bool(), None);
        assert_eq!(root.field("missing").string(), None);
    }

    #[test]
    fn test_id_list_forms() {
        let raw = json!({"a": [1, "2", "x"], "b": "3, 4,5", "c": 9});
        let root = Node::root(&raw);
        assert_eq!(root.field("a").id_list(), vec![1, 2]);
        assert_eq!(root.field("b").id_list(), vec![3, 4, 5]);
        assert_eq!(root.field("c").id_list(), vec![9]);
    }

    #[test]
    fn test_decimal_from_string_and_number() {
        let raw = json!({"a": "25.00", "b": 18.5, "c": ""});
        let root = Node::root(&raw);
        assert_eq!(root.field("a").decimal(), Some(Decimal::new(2500, 2)));
        assert_eq!(root.field("b").decimal(), Some(Decimal::new(185, 1)));
        assert_eq!(root.field("c").decimal(), None);
    }

    #[test]
    fn test_discriminant_errors() {
        let raw = json!({"kind": "everything", "other": 3});
        let root = Node::root(&raw);
        let parse = |s: &str| (s == "all").then_some(());
        let err = root.field("kind").discriminant(parse, &["all"]).unwrap_err();
        assert_eq!(err.field, "kind");
        assert_eq!(err.found, "everything");
        let err = root.field("missing").discriminant(parse, &["all"]).unwrap_err();
        assert_eq!(err.found, "<missing>");
        assert!(root.field("other").discriminant(parse, &["all"]).is_err());
    }
}
