//! Literal escaping for generated SQL.
//!
//! Values flowing into a `column op value` condition are rendered through
//! [`escape`]. Strings that look like pre-formed SQL (function calls,
//! template placeholders) pass through verbatim.

use std::fmt;

/// Characters that mark a string as an already-formed SQL expression.
const EXPRESSION_MARKERS: &[char] = &['(', ')', '{', '}'];

/// Errors raised while escaping a value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EscapeError {
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(&'static str),

    #[error("Non-finite number cannot be rendered as SQL: {0}")]
    NonFiniteNumber(f64),
}

/// A literal value that can appear on the right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Lists have no scalar SQL rendering and are rejected by [`escape`].
    Array(Vec<Value>),
    /// Objects have no scalar SQL rendering and are rejected by [`escape`].
    Object(serde_json::Map<String, serde_json::Value>),
}

impl Value {
    /// Name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // u64 beyond i64::MAX and real numbers both land here
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(map),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match escape(self) {
            Ok(sql) => f.write_str(&sql),
            Err(_) => write!(f, "<{}>", self.kind()),
        }
    }
}

/// Render a value as SQL text.
///
/// | Value | Output |
/// |---|---|
/// | `Null` | `NULL` |
/// | number | decimal text |
/// | `Bool` | `1` / `0` |
/// | string containing `(`, `)`, `{` or `}` | verbatim |
/// | other string | single-quoted, `'` doubled |
///
/// # Errors
///
/// Arrays and objects return [`EscapeError::UnsupportedValueType`];
/// NaN and infinities return [`EscapeError::NonFiniteNumber`].
pub fn escape(value: &Value) -> Result<String, EscapeError> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(f) if !f.is_finite() => Err(EscapeError::NonFiniteNumber(*f)),
        Value::Float(f) => Ok(f.to_string()),
        Value::String(s) if s.contains(EXPRESSION_MARKERS) => Ok(s.clone()),
        Value::String(s) => Ok(quote_string(s)),
        Value::Array(_) | Value::Object(_) => Err(EscapeError::UnsupportedValueType(value.kind())),
    }
}

/// Single-quote a string literal, doubling embedded quotes.
#[must_use]
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
