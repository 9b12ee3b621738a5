//! Runtime values seen by template expressions
//!
//! Render contexts are serialized through `serde_json` and converted into
//! [`Value`], so every template sees plain data: no functions, no handles,
//! nothing an expression could call.

mod convert;
mod display;

use std::sync::Arc;

use indexmap::IndexMap;

/// A value that a template expression can produce.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// JSON `null`
    Null,

    /// Boolean
    Bool(bool),

    /// Integer (any JSON number without a fractional part that fits)
    I64(i64),

    /// Floating point number
    F64(f64),

    /// String
    String(Arc<String>),

    /// Ordered list of values
    Array(Arc<Vec<Value>>),

    /// Object with keys kept in insertion order
    Object(Arc<IndexMap<String, Value>>),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::new(s.into()))
    }

    /// Create an array value.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }

    /// Create an object value from key/value pairs.
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(Arc::new(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Borrow the string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Look up a key, if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.get(key),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::new(s))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::I64(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_lookup() {
        let v = Value::object([("name", Value::from("Oak")), ("age", Value::I64(120))]);
        assert_eq!(v.get("name"), Some(&Value::from("Oak")));
        assert_eq!(v.get("missing"), None);
        assert_eq!(Value::from("x").get("name"), None);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(Value::from("maple").as_str(), Some("maple"));
        assert_eq!(Value::Bool(true).as_str(), None);
    }
}
