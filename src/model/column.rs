//! Column and schema definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single column of a datasource.
///
/// The column name is the key it is stored under in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct Column {
    /// SQL type as understood by the platform (`String`, `DateTime64(3)`, ...).
    #[serde(rename = "type")]
    pub sql_type: String,

    /// JSONPath the column is extracted from. Defaults to `$.<name>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Column {
    pub fn new(sql_type: impl Into<String>) -> Self {
        Self {
            sql_type: sql_type.into(),
            json_path: None,
            nullable: false,
            comment: None,
        }
    }

    pub fn json_path(mut self, path: impl Into<String>) -> Self {
        self.json_path = Some(path.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The type as it appears in the schema, wrapped in `Nullable(...)` when needed.
    pub fn rendered_type(&self) -> String {
        if self.nullable && !self.sql_type.starts_with("Nullable(") {
            format!("Nullable({})", self.sql_type)
        } else {
            self.sql_type.clone()
        }
    }

    /// The JSONPath for this column, falling back to `$.<name>`.
    pub fn resolved_json_path(&self, name: &str) -> String {
        match &self.json_path {
            Some(path) => path.clone(),
            None => format!("$.{}", name),
        }
    }
}

// =============================================================================
// Type constructors
// =============================================================================

pub fn string() -> Column {
    Column::new("String")
}

pub fn int32() -> Column {
    Column::new("Int32")
}

pub fn int64() -> Column {
    Column::new("Int64")
}

pub fn uint64() -> Column {
    Column::new("UInt64")
}

pub fn float64() -> Column {
    Column::new("Float64")
}

pub fn boolean() -> Column {
    Column::new("Bool")
}

pub fn date() -> Column {
    Column::new("Date")
}

pub fn date_time() -> Column {
    Column::new("DateTime")
}

/// `DateTime64(precision)`
pub fn date_time64(precision: u8) -> Column {
    Column::new(format!("DateTime64({})", precision))
}

/// `LowCardinality(String)`
pub fn low_cardinality_string() -> Column {
    Column::new("LowCardinality(String)")
}

/// `Array(inner)`
pub fn array(inner: &str) -> Column {
    Column::new(format!("Array({})", inner))
}

// =============================================================================
// Schema
// =============================================================================

/// An ordered set of named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: IndexMap<String, Column>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Re-adding a name replaces the column in place.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.columns.insert(name.into(), column);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), col))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Column)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, Column)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(n, c)| (n.into(), c)).collect(),
        }
    }
}
