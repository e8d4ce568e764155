/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Values written into marker nodes.
//!
//! Operations accept an [`IceValue`] wherever the caller may pass "anything
//! coercible to text": strings, numbers, booleans, lists (for [`repeat`]) and
//! maps (for data binding). Absent values are [`IceValue::Null`].
//!
//! [`repeat`]: crate::TemplateEngine::repeat

use std::collections::BTreeMap;

/// A dynamically-typed value passed to template operations.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum IceValue {
    /// A string value.
    String(String),

    /// A numeric value.
    Number(f64),

    /// A boolean value.
    Bool(bool),

    /// An ordered sequence of values.
    List(Vec<IceValue>),

    /// A map of string keys to values, iterated in key order.
    Map(BTreeMap<String, IceValue>),

    /// A null/absent value.
    #[default]
    Null,
}

impl IceValue {
    /// Render this value as text.
    ///
    /// - String: returned as-is
    /// - Number: integral values without a fractional part
    /// - Bool: "true" or "" (empty for false)
    /// - List: concatenation of rendered elements
    /// - Map: "true"
    /// - Null: ""
    pub fn render(&self) -> String {
        match self {
            IceValue::String(s) => s.clone(),
            IceValue::Number(n) => render_number(*n),
            IceValue::Bool(true) => "true".to_string(),
            IceValue::Bool(false) => String::new(),
            IceValue::List(items) => items.iter().map(|v| v.render()).collect(),
            IceValue::Map(_) => "true".to_string(),
            IceValue::Null => String::new(),
        }
    }

    /// Check if this value is empty or absent.
    ///
    /// Blank values are null, the empty string, `false` and the empty list.
    /// A non-empty list is never blank, even if its items are.
    pub fn is_blank(&self) -> bool {
        match self {
            IceValue::String(s) => s.is_empty(),
            IceValue::Bool(b) => !b,
            IceValue::List(items) => items.is_empty(),
            IceValue::Map(_) | IceValue::Number(_) => false,
            IceValue::Null => true,
        }
    }

    /// Borrow the items if this value is a list.
    pub fn as_list(&self) -> Option<&[IceValue]> {
        match self {
            IceValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the entries if this value is a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, IceValue>> {
        match self {
            IceValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            IceValue::String(_) => "string",
            IceValue::Number(_) => "number",
            IceValue::Bool(_) => "boolean",
            IceValue::List(_) => "list",
            IceValue::Map(_) => "map",
            IceValue::Null => "null",
        }
    }
}

fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for IceValue {
    fn from(s: &str) -> Self {
        IceValue::String(s.to_string())
    }
}

impl From<String> for IceValue {
    fn from(s: String) -> Self {
        IceValue::String(s)
    }
}

impl From<&String> for IceValue {
    fn from(s: &String) -> Self {
        IceValue::String(s.clone())
    }
}

impl From<bool> for IceValue {
    fn from(b: bool) -> Self {
        IceValue::Bool(b)
    }
}

impl From<f64> for IceValue {
    fn from(n: f64) -> Self {
        IceValue::Number(n)
    }
}

impl From<i32> for IceValue {
    fn from(n: i32) -> Self {
        IceValue::Number(f64::from(n))
    }
}

impl From<i64> for IceValue {
    fn from(n: i64) -> Self {
        IceValue::Number(n as f64)
    }
}

impl From<usize> for IceValue {
    fn from(n: usize) -> Self {
        IceValue::Number(n as f64)
    }
}

impl<T: Into<IceValue>> From<Option<T>> for IceValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(IceValue::Null, Into::into)
    }
}

impl<T: Into<IceValue>> From<Vec<T>> for IceValue {
    fn from(items: Vec<T>) -> Self {
        IceValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for IceValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => IceValue::Null,
            serde_json::Value::Bool(b) => IceValue::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(IceValue::Null, IceValue::Number),
            serde_json::Value::String(s) => IceValue::String(s),
            serde_json::Value::Array(items) => {
                IceValue::List(items.into_iter().map(IceValue::from).collect())
            }
            serde_json::Value::Object(entries) => IceValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, IceValue::from(v)))
                    .collect(),
            ),
        }
    }
}
