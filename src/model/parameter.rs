//! Pipe parameter definitions.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Key under which the `toml` deserializer hands out dates and times.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// Parameter types understood by the platform's template runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    String,
    Int64,
    Float64,
    DateTime,
    Date,
    Boolean,
}

impl ParamType {
    pub const ALL: [ParamType; 6] = [
        ParamType::String,
        ParamType::Int64,
        ParamType::Float64,
        ParamType::DateTime,
        ParamType::Date,
        ParamType::Boolean,
    ];

    /// Template function name (`String`, `Int64`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "String",
            ParamType::Int64 => "Int64",
            ParamType::Float64 => "Float64",
            ParamType::DateTime => "DateTime",
            ParamType::Date => "Date",
            ParamType::Boolean => "Boolean",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Whether default values of this type are written as quoted strings.
    pub fn is_quoted(&self) -> bool {
        matches!(self, ParamType::String | ParamType::DateTime | ParamType::Date)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single pipe parameter.
///
/// A parameter that is neither `required` nor has a `default` is
/// *conditional*: its placeholder only applies when the caller supplies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct Parameter {
    #[serde(rename = "type")]
    pub param_type: ParamType,

    #[serde(default)]
    pub required: bool,

    /// Default value. `Some(Value::Null)` is an explicit null default,
    /// distinct from having no default at all.
    #[serde(
        default,
        deserialize_with = "deserialize_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<serde_json::Value>,

    /// Allowed values. Enumerated parameters are always passed as `String`.
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    pub fn new(param_type: ParamType) -> Self {
        Self {
            param_type,
            required: false,
            default: None,
            allowed: Vec::new(),
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(ParamType::String)
    }

    pub fn int64() -> Self {
        Self::new(ParamType::Int64)
    }

    pub fn float64() -> Self {
        Self::new(ParamType::Float64)
    }

    pub fn date_time() -> Self {
        Self::new(ParamType::DateTime)
    }

    pub fn date() -> Self {
        Self::new(ParamType::Date)
    }

    pub fn boolean() -> Self {
        Self::new(ParamType::Boolean)
    }

    /// A parameter restricted to a fixed set of string values.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: values.into_iter().map(Into::into).collect(),
            ..Self::string()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Explicit `null` default.
    pub fn default_null(mut self) -> Self {
        self.default = Some(serde_json::Value::Null);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The type used in the template placeholder.
    pub fn token_type(&self) -> ParamType {
        if self.allowed.is_empty() {
            self.param_type
        } else {
            ParamType::String
        }
    }

    /// Neither required nor defaulted.
    pub fn is_conditional(&self) -> bool {
        !self.required && self.default.is_none()
    }
}

/// Read a default value, turning TOML dates and times into their text form.
///
/// A present `null` stays `Some(Value::Null)`; only a missing key is `None`.
fn deserialize_default<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(Some(unwrap_toml_datetime(value)))
}

fn unwrap_toml_datetime(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(mut map) if map.len() == 1 => match map.remove(TOML_DATETIME_KEY) {
            Some(JsonValue::String(text)) => JsonValue::String(text),
            Some(other) => {
                map.insert(TOML_DATETIME_KEY.to_string(), other);
                JsonValue::Object(map)
            }
            None => JsonValue::Object(map),
        },
        other => other,
    }
}

/// An ordered map of parameter name to definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    params: IndexMap<String, Parameter>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, param: Parameter) -> Self {
        self.params.insert(name.into(), param);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.params.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Parameter)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (S, Parameter)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|(n, p)| (n.into(), p)).collect(),
        }
    }
}
